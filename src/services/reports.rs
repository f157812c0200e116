use crate::dto::reports::{CashflowView, DashboardView, ExpiringView, OverdueView, ReportView};
use crate::forms::reports::CashflowForm;
use crate::repository::ReportReader;
use crate::services::{ServiceError, ServiceResult};

pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

pub async fn expiring_report<R: ReportReader>(repo: &R) -> ServiceResult<ExpiringView> {
    let rows = repo.expiring_clients().await.map_err(|err| {
        log::error!("Failed to load expiring report: {err}");
        ServiceError::from(err)
    })?;
    Ok(ReportView::new(rows, "No hay membresías por vencer."))
}

pub async fn overdue_report<R: ReportReader>(repo: &R) -> ServiceResult<OverdueView> {
    let rows = repo.overdue_clients().await.map_err(|err| {
        log::error!("Failed to load overdue report: {err}");
        ServiceError::from(err)
    })?;
    Ok(ReportView::new(rows, "No hay membresías vencidas."))
}

/// Total collected between the form dates; the range is checked before any
/// request goes out.
pub async fn cashflow_report<R: ReportReader>(
    repo: &R,
    form: &CashflowForm,
) -> ServiceResult<CashflowView> {
    let (from, to) = form.range()?;
    let total = repo.cashflow(from, to).await.map_err(|err| {
        log::error!("Failed to load cashflow {from}..{to}: {err}");
        ServiceError::from(err)
    })?;
    Ok(CashflowView::new(from, to, total))
}

/// Counters and the latest activity, fetched together.
pub async fn dashboard<R: ReportReader>(repo: &R, limit: usize) -> ServiceResult<DashboardView> {
    let (stats, activities) =
        futures::join!(repo.dashboard_stats(), repo.recent_activities(limit));
    let stats = stats.map_err(|err| {
        log::error!("Failed to load dashboard stats: {err}");
        ServiceError::from(err)
    })?;
    let activities = activities.unwrap_or_else(|err| {
        log::warn!("Recent activity unavailable: {err}");
        Vec::new()
    });
    Ok(DashboardView { stats, activities })
}
