//! GST computation shared by every procurement document.
//!
//! Intrastate supplies split the tax into equal CGST and SGST halves;
//! interstate supplies carry the whole amount as IGST. Exactly one of the two
//! sides is ever non-zero for a given computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// One taxable line: quantity, per-unit rate, and GST percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub quantity: Decimal,
    pub rate: Decimal,
    pub gst_rate: Decimal,
}

impl TaxLine {
    pub fn new(quantity: Decimal, rate: Decimal, gst_rate: Decimal) -> Self {
        Self {
            quantity,
            rate,
            gst_rate,
        }
    }

    /// Line amount inclusive of GST: quantity × rate × (1 + gst/100).
    pub fn amount(&self) -> Decimal {
        let base = self.quantity * self.rate;
        base + base * self.gst_rate / Decimal::ONE_HUNDRED
    }
}

/// Computed totals for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTotals {
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}

impl TaxTotals {
    pub fn total_gst(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    /// Applies line-item-independent additive adjustments after GST:
    /// a signed charges/discount amount and a signed rounding correction.
    pub fn with_adjustments(mut self, other_charges: Decimal, rounding: Decimal) -> Self {
        self.total += other_charges + rounding;
        self
    }
}

/// Computes subtotal, GST split, and total for a set of lines.
///
/// Negative quantity, rate, or GST rate is rejected outright rather than
/// clamped; a GST rate above 100 percent is rejected as well.
pub fn calculate(lines: &[TaxLine], intrastate: bool) -> Result<TaxTotals, ServiceError> {
    let mut subtotal = Decimal::ZERO;
    let mut total_gst = Decimal::ZERO;

    for (idx, line) in lines.iter().enumerate() {
        if line.quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: quantity must not be negative",
                idx + 1
            )));
        }
        if line.rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: rate must not be negative",
                idx + 1
            )));
        }
        if line.gst_rate < Decimal::ZERO || line.gst_rate > Decimal::ONE_HUNDRED {
            return Err(ServiceError::ValidationError(format!(
                "Line {}: GST rate must be between 0 and 100",
                idx + 1
            )));
        }

        let base = line.quantity * line.rate;
        subtotal += base;
        total_gst += base * line.gst_rate / Decimal::ONE_HUNDRED;
    }

    let (cgst, sgst, igst) = if intrastate {
        let half = total_gst / Decimal::TWO;
        (half, half, Decimal::ZERO)
    } else {
        (Decimal::ZERO, Decimal::ZERO, total_gst)
    };

    Ok(TaxTotals {
        subtotal,
        cgst,
        sgst,
        igst,
        total: subtotal + total_gst,
    })
}
