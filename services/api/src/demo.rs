use crate::infra::{
    demo_colleague, demo_dean, demo_professor, InMemoryPlanningStore, StoreNotifier,
};
use clap::Args;
use faculty_planner::error::AppError;
use faculty_planner::workflows::catalog::{standard_catalog, CatalogImporter};
use faculty_planner::workflows::planning::{
    Activity, FunctionalCategory, NewAcademicPeriod, NewActivity, NewActivityDetail, NewEvidence,
    NewPlan, PlanAnnotation, PlanningError, PlanningService, SummaryOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional registrar CSV export to load the catalog from.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Academic period the walkthrough plans against.
    #[arg(long, default_value = "2025-2026 Term I")]
    pub(crate) period_name: String,
    /// Length of the walkthrough period in weeks.
    #[arg(long, default_value_t = 16)]
    pub(crate) weeks: u32,
    /// Include the raw plan detail listing in the output.
    #[arg(long)]
    pub(crate) include_details: bool,
    /// Skip the dean annotation portion of the demo.
    #[arg(long)]
    pub(crate) skip_annotation: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogValidateArgs {
    /// Path to the registrar CSV export
    pub(crate) path: PathBuf,
    /// List every parsed entry instead of only the per-category counts
    #[arg(long)]
    pub(crate) list_entries: bool,
}

pub(crate) fn run_catalog_validate(args: CatalogValidateArgs) -> Result<(), AppError> {
    let CatalogValidateArgs { path, list_entries } = args;

    let drafts = CatalogImporter::from_path(&path)?;
    println!(
        "Catalog export {} parsed: {} entries",
        path.display(),
        drafts.len()
    );

    for category in FunctionalCategory::ordered() {
        let count = drafts
            .iter()
            .filter(|draft| draft.category == category)
            .count();
        println!("- {}: {} entries", category.label(), count);
    }

    if list_entries {
        println!("\nEntries");
        for draft in &drafts {
            println!("- {}", describe_catalog_entry(draft));
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog_csv,
        period_name,
        weeks,
        include_details,
        skip_annotation,
    } = args;

    println!("Faculty workload planner demo");

    let store = Arc::new(InMemoryPlanningStore::default());
    let notifier = Arc::new(StoreNotifier::new(store.clone()));
    let service = PlanningService::new(store, notifier);

    let (drafts, source) = match catalog_csv {
        Some(path) => {
            let drafts = CatalogImporter::from_path(&path)?;
            (drafts, format!("CSV export {}", path.display()))
        }
        None => (standard_catalog(), "built-in standard catalog".to_string()),
    };
    let catalog = service.import_catalog(drafts)?;
    println!("Catalog loaded from {}: {} entries", source, catalog.len());

    let period = service.create_period(NewAcademicPeriod {
        name: period_name,
        weeks,
    })?;
    println!("Period registered: {} ({} weeks)", period.name, period.weeks);

    let professor = demo_professor();
    let colleague = demo_colleague();
    let dean = demo_dean();

    println!("\nPlanning as {}", professor.username);
    let plan = service.create_plan(
        &professor,
        NewPlan {
            period: period.id,
            active: true,
        },
    )?;
    println!("- Opened plan {} (active)", plan.id.0);

    let teaching = catalog_entry(&catalog, FunctionalCategory::Teaching)?;
    let research = catalog_entry(&catalog, FunctionalCategory::Research)?;
    let management = catalog_entry(&catalog, FunctionalCategory::Management)?;

    let lecture_detail = service.create_detail(
        &professor,
        NewActivityDetail {
            plan: plan.id,
            activity: teaching.id,
            assigned_hours: 12,
            period_hours: 12 * weeks,
            expected_product: Some("Course syllabus and grade records".to_string()),
            justification: None,
        },
    )?;
    service.create_detail(
        &professor,
        NewActivityDetail {
            plan: plan.id,
            activity: research.id,
            assigned_hours: 6,
            period_hours: 6 * weeks,
            expected_product: Some("Annual project report".to_string()),
            justification: None,
        },
    )?;
    service.create_detail(
        &professor,
        NewActivityDetail {
            plan: plan.id,
            activity: management.id,
            assigned_hours: 4,
            period_hours: 4 * weeks,
            expected_product: None,
            justification: None,
        },
    )?;
    println!(
        "- Filed detail lines against {}, {} and {}",
        teaching.code, research.code, management.code
    );

    service.create_evidence(
        &professor,
        NewEvidence {
            detail: Some(lecture_detail.id),
            file_name: Some("syllabus-term1.pdf".to_string()),
            url: None,
        },
    )?;
    println!("- Attached lecture evidence to detail {}", lecture_detail.id.0);

    println!("\nVisibility check");
    let own = service.scoped_plans(&professor)?;
    let everyone = service.scoped_plans(&dean)?;
    println!(
        "- {} sees {} plan(s); dean {} sees {}",
        professor.username,
        own.len(),
        dean.username,
        everyone.len()
    );
    let colleague_plans = service.scoped_plans(&colleague)?;
    println!(
        "- {} sees {} plan(s) (owns none)",
        colleague.username,
        colleague_plans.len()
    );

    if !skip_annotation {
        println!("\nDean review as {}", dean.username);
        service.annotate_plan(
            &dean,
            plan.id,
            PlanAnnotation {
                comment: "Reviewed. Balance outreach hours next term.".to_string(),
            },
        )?;
        for notification in service.scoped_notifications(&professor)? {
            println!("- Inbox for {}: {}", professor.username, notification.message);
        }
    }

    println!("\nWorkload summary for {}", professor.username);
    render_summary(&service.workload_summary(&professor)?);

    println!("\nWorkload summary for {} (no plans)", colleague.username);
    render_summary(&service.workload_summary(&colleague)?);

    if include_details {
        println!("\nDetail lines");
        for detail in service.scoped_details(&professor)? {
            println!(
                "- detail {} | plan {} | activity {} | {} h/week, {} h/period",
                detail.id.0,
                detail.plan.0,
                detail.activity.0,
                detail.assigned_hours,
                detail.period_hours
            );
        }
    }

    Ok(())
}

fn render_summary(outcome: &SummaryOutcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Summary payload unavailable: {err}"),
    }
}

fn catalog_entry(
    catalog: &[Activity],
    category: FunctionalCategory,
) -> Result<Activity, PlanningError> {
    catalog
        .iter()
        .find(|entry| entry.category == category)
        .cloned()
        .ok_or(PlanningError::NotFound)
}

fn describe_catalog_entry(draft: &NewActivity) -> String {
    let description = draft.description.as_deref().unwrap_or("(no description)");
    let weekly = draft
        .max_weekly_hours
        .map(|cap| cap.to_string())
        .unwrap_or_else(|| "-".to_string());
    let period = draft
        .max_period_hours
        .map(|cap| cap.to_string())
        .unwrap_or_else(|| "-".to_string());
    let evidence = if draft.evidence_required {
        "evidence required"
    } else {
        "no evidence"
    };

    format!(
        "{} | {} | {} | caps {}/wk {}/period | {}",
        draft.code,
        draft.category.label(),
        description,
        weekly,
        period,
        evidence
    )
}
