use std::collections::BTreeMap;

use super::super::domain::{AcademicPeriod, FunctionalCategory, Plan};
use super::super::identity::AuthenticatedUser;
use super::views::WorkloadSummary;

/// The plan a summary speaks for: the one carrying the `active` flag, or the
/// oldest plan when none is flagged. Returns `None` only for an empty slice.
pub fn select_current_plan(plans: &[Plan]) -> Option<&Plan> {
    plans
        .iter()
        .filter(|plan| plan.active)
        .min_by_key(|plan| plan.id)
        .or_else(|| plans.iter().min_by_key(|plan| plan.id))
}

/// Fold `(category, hours)` rows into per-category totals. Sums saturate.
pub fn sum_hours_by_category<I>(rows: I) -> BTreeMap<FunctionalCategory, u32>
where
    I: IntoIterator<Item = (FunctionalCategory, u32)>,
{
    let mut totals = BTreeMap::new();
    for (category, hours) in rows {
        let slot = totals.entry(category).or_insert(0u32);
        *slot = slot.saturating_add(hours);
    }
    totals
}

pub(crate) fn build_summary(
    user: &AuthenticatedUser,
    period: &AcademicPeriod,
    plan: &Plan,
    totals: &BTreeMap<FunctionalCategory, u32>,
) -> WorkloadSummary {
    let hours = |category: FunctionalCategory| totals.get(&category).copied().unwrap_or(0);
    let total = FunctionalCategory::ordered()
        .into_iter()
        .fold(0u32, |acc, category| acc.saturating_add(hours(category)));

    WorkloadSummary {
        teaching_hours: hours(FunctionalCategory::Teaching),
        research_hours: hours(FunctionalCategory::Research),
        outreach_hours: hours(FunctionalCategory::Outreach),
        management_hours: hours(FunctionalCategory::Management),
        total,
        faculty_name: user.username.clone(),
        national_id: user.national_id.clone(),
        school: user.school.clone(),
        period_name: period.name.clone(),
        period_weeks: period.weeks,
        remarks: plan.dean_comment.clone().unwrap_or_default(),
    }
}
