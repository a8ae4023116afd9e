//! Resistance to temperature conversion for a PT100 RTD

/// Callendar-Van Dusen coefficient A (IEC 60751)
const CVD_A: f64 = 3.908_30e-3;
/// Callendar-Van Dusen coefficient B (IEC 60751)
const CVD_B: f64 = -5.775_00e-7;
/// PT100 resistance at 0 °C
const R0: f64 = 100.0;

// Polynomial fits of T(R) over -200 °C..660 °C, highest order first.
// Maximum fitting errors: 0.98 °C, 0.39 °C and 0.13 °C.
const POLY3: [f64; 4] = [7.004_06e-7, 8.478_00e-4, 2.358_41, -2.449_50e2];
const POLY4: [f64; 5] = [4.115_30e-9, -2.213_78e-6, 1.533_59e-3, 2.298_35, -2.434_65e2];
const POLY5: [f64; 6] = [
    -2.106_78e-11,
    2.273_11e-8,
    -8.208_88e-6,
    2.385_89e-3,
    2.247_45,
    -2.425_22e2,
];

/// Resistance to temperature strategy
///
/// The polynomial strategies differ only in accuracy; their cost is
/// negligible next to the conversion settling delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conversion {
    /// Closed form inverse of Callendar-Van Dusen, see [`callendar_van_dusen`]
    Exact,
    /// 3rd order fit, max error 0.98 °C
    Poly3,
    /// 4th order fit, max error 0.39 °C
    Poly4,
    /// 5th order fit, max error 0.13 °C
    #[default]
    Poly5,
}

impl Conversion {
    /// Convert an RTD resistance in ohms to °C
    #[must_use]
    pub fn to_celsius(self, ohms: f64) -> f64 {
        match self {
            Conversion::Exact => callendar_van_dusen(ohms),
            Conversion::Poly3 => polynomial(&POLY3, ohms),
            Conversion::Poly4 => polynomial(&POLY4, ohms),
            Conversion::Poly5 => polynomial(&POLY5, ohms),
        }
    }

    /// Coefficients of the fit, highest order first; empty for [`Conversion::Exact`]
    #[must_use]
    pub fn coefficients(self) -> &'static [f64] {
        match self {
            Conversion::Exact => &[],
            Conversion::Poly3 => &POLY3,
            Conversion::Poly4 => &POLY4,
            Conversion::Poly5 => &POLY5,
        }
    }
}

/// Solve the quadratic Callendar-Van Dusen equation for temperature
///
/// `R(T) = R0 * (1 + A*T + B*T^2)` only holds for T >= 0 °C. Below that the
/// real curve has an extra cubic term, so resistances under 100 Ω give a
/// temperature that is off by a growing margin (about 0.2 °C at -100 °C,
/// 2.4 °C at -200 °C). Above roughly 761 Ω the discriminant turns
/// negative and the result is NaN. Neither case is corrected here.
#[must_use]
pub fn callendar_van_dusen(ohms: f64) -> f64 {
    let discriminant = CVD_A * CVD_A * R0 * R0 - 4.0 * CVD_B * R0 * (R0 - ohms);
    (-CVD_A * R0 + libm::sqrt(discriminant)) / (2.0 * CVD_B * R0)
}

/// Evaluate a polynomial with Horner's scheme, coefficients highest order first
#[must_use]
pub fn polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Convert °C to °F
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    9.0 / 5.0 * celsius + 32.0
}
