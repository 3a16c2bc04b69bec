//! Platform fee split.
//!
//! The platform keeps a fixed share of every contribution; the rest is routed to
//! the campaign. Arithmetic always runs on the unrounded amount, rounding only
//! happens when formatting the preview.

use serde::Serialize;

use super::amount::ContributionAmount;

/// Fraction of each contribution retained by the platform.
pub const FEE_RATE: f64 = 0.05;

/// Decimal places shown in the user-facing preview.
pub const PREVIEW_DECIMALS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeSplit {
    pub gross_amount: f64,
    pub platform_fee: f64,
    pub net_to_campaign: f64,
}

impl FeeSplit {
    pub fn for_amount(amount: ContributionAmount) -> Self {
        let gross_amount = amount.value();
        let platform_fee = gross_amount * FEE_RATE;
        FeeSplit {
            gross_amount,
            platform_fee,
            net_to_campaign: gross_amount - platform_fee,
        }
    }

    pub fn preview(&self) -> FeePreview {
        FeePreview {
            gross: format_amount(self.gross_amount),
            fee: format_amount(self.platform_fee),
            net: format_amount(self.net_to_campaign),
        }
    }
}

/// Display strings for a fee split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeePreview {
    pub gross: String,
    pub fee: String,
    pub net: String,
}

fn format_amount(value: f64) -> String {
    format!("{value:.prec$}", prec = PREVIEW_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn split(raw: &str) -> FeeSplit {
        FeeSplit::for_amount(ContributionAmount::parse(raw).unwrap())
    }

    #[test]
    fn one_unit_splits_five_percent() {
        let s = split("1.0");
        assert!((s.platform_fee - 0.05).abs() < TOLERANCE);
        assert!((s.net_to_campaign - 0.95).abs() < TOLERANCE);
    }

    #[test]
    fn minimum_contribution_split() {
        let s = split("0.001");
        assert!((s.platform_fee - 0.00005).abs() < TOLERANCE);
        assert!((s.net_to_campaign - 0.00095).abs() < TOLERANCE);
    }

    #[test]
    fn parts_sum_to_gross() {
        for raw in ["0.001", "0.0123", "1", "1.5", "3.333333", "99.99", "123456.789"] {
            let s = split(raw);
            assert!(
                (s.platform_fee + s.net_to_campaign - s.gross_amount).abs() < TOLERANCE,
                "amount {raw}"
            );
        }
    }

    #[test]
    fn preview_rounds_to_three_places() {
        let preview = split("1.5").preview();
        assert_eq!(preview.gross, "1.500");
        assert_eq!(preview.fee, "0.075");
        assert_eq!(preview.net, "1.425");

        let tiny = split("0.001").preview();
        assert_eq!(tiny.fee, "0.000");
        assert_eq!(tiny.net, "0.001");
    }

    #[test]
    fn fee_uses_unrounded_amount() {
        // 0.0119 rounds to 0.012 for display, but the fee is computed from the raw value.
        let s = split("0.0119");
        assert!((s.platform_fee - 0.000595).abs() < TOLERANCE);
    }
}
