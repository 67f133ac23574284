//! Derived tenure features
//!
//! The model expects both values precomputed. The interactive CLI leaves that
//! to the caller; the web form fills them from the tenure fields it collects.
//!
//! The formulas below are assumed: neither artifact records how these columns
//! were built at training time. A caller that knows the training definition
//! should pass the values in directly (the form accepts explicit
//! `TenureRatio`/`PromotionGap` fields, which take precedence).

use super::FeatureVector;

pub const TENURE_RATIO: &str = "TenureRatio";
pub const PROMOTION_GAP: &str = "PromotionGap";

/// Share of the career spent at the current company.
///
/// 0.0 when there is no working history to divide by.
pub fn tenure_ratio(years_at_company: f64, total_working_years: f64) -> f64 {
    if total_working_years > 0.0 {
        years_at_company / total_working_years
    } else {
        0.0
    }
}

/// Years at the company before the most recent promotion.
pub fn promotion_gap(years_at_company: f64, years_since_last_promotion: f64) -> f64 {
    years_at_company - years_since_last_promotion
}

/// Recompute both derived columns from the tenure columns already in `features`.
pub fn fill(features: &mut FeatureVector) {
    let at_company = features.get("YearsAtCompany").unwrap_or(0.0);
    let total = features.get("TotalWorkingYears").unwrap_or(0.0);
    let since_promotion = features.get("YearsSinceLastPromotion").unwrap_or(0.0);

    features.set(TENURE_RATIO, tenure_ratio(at_company, total));
    features.set(PROMOTION_GAP, promotion_gap(at_company, since_promotion));
}
