//! IVA decomposition of tax-inclusive totals

/// Chilean value-added tax rate
pub const IVA_RATE: f64 = 0.19;

/// A tax-inclusive total split into net amount and tax
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBreakdown {
    /// Amount before tax
    pub subtotal: f64,
    /// Tax portion
    pub tax: f64,
    /// Tax-inclusive total, as given
    pub total: f64,
}

impl TaxBreakdown {
    /// Split a gross total at the standard IVA rate
    ///
    /// # Examples
    /// ```
    /// use cl_format::TaxBreakdown;
    /// let split = TaxBreakdown::from_gross(119.0);
    /// assert!((split.subtotal - 100.0).abs() < 0.01);
    /// assert!((split.tax - 19.0).abs() < 0.01);
    /// ```
    pub fn from_gross(total: f64) -> Self {
        Self::with_rate(total, IVA_RATE)
    }

    /// Split a gross total at an arbitrary rate
    ///
    /// The subtotal is `total / (1 + rate)` and the tax is the remainder,
    /// so the two always add back up to `total`.
    pub fn with_rate(total: f64, rate: f64) -> Self {
        let subtotal = total / (1.0 + rate);
        Self {
            subtotal,
            tax: total - subtotal,
            total,
        }
    }
}
