//! Turns free-text UI filter inputs into backend filter criteria.
//!
//! Status and activity selectors may arrive as localized labels ("Al día",
//! "Vencido", "Activo"), as technical values ("UP_TO_DATE") or as anything an
//! operator typed. Every value is folded to upper case without accents before
//! the lookup, and unknown values are dropped rather than forwarded.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::cache::ClientCache;
use crate::domain::filters::{ClientFilters, PaymentFilters};
use crate::domain::types::{ClientId, PaymentStatusFilter};
use crate::dto::clients::ClientsQuery;
use crate::dto::payments::PaymentsQuery;
use crate::forms::parse_optional_date;
use crate::services::ServiceResult;

const ACTIVE_VALUES: &[(&str, bool)] = &[
    ("ACTIVO", true),
    ("ACTIVOS", true),
    ("ACTIVE", true),
    ("TRUE", true),
    ("SI", true),
    ("1", true),
    ("INACTIVO", false),
    ("INACTIVOS", false),
    ("INACTIVE", false),
    ("FALSE", false),
    ("NO", false),
    ("0", false),
];

const PAYMENT_STATUS_VALUES: &[(&str, PaymentStatusFilter)] = &[
    ("AL DIA", PaymentStatusFilter::UpToDate),
    ("AL_DIA", PaymentStatusFilter::UpToDate),
    ("UP TO DATE", PaymentStatusFilter::UpToDate),
    ("UP_TO_DATE", PaymentStatusFilter::UpToDate),
    ("VIGENTE", PaymentStatusFilter::UpToDate),
    ("VENCIDO", PaymentStatusFilter::Expired),
    ("VENCIDOS", PaymentStatusFilter::Expired),
    ("EXPIRED", PaymentStatusFilter::Expired),
    ("ANULADO", PaymentStatusFilter::Voided),
    ("ANULADOS", PaymentStatusFilter::Voided),
    ("VOIDED", PaymentStatusFilter::Voided),
];

const PAYMENT_PREFIX: &str = "PAGO:";

/// Upper-cases `text`, strips accents and collapses inner whitespace.
pub fn normalize_label(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps an activity selector to a flag; `TODOS`, blanks and unknown text
/// mean no constraint.
pub fn resolve_active(text: Option<&str>) -> Option<bool> {
    let key = normalize_label(text?);
    ACTIVE_VALUES
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, value)| *value)
}

/// Maps a payment-status selector to the canonical enum.
///
/// A leading `PAGO:` is ignored so grouped selector values such as
/// `"Pago: Al día"` resolve like the bare label.
pub fn resolve_payment_status(text: Option<&str>) -> Option<PaymentStatusFilter> {
    let key = normalize_label(text?);
    let key = key.strip_prefix(PAYMENT_PREFIX).map_or(key.as_str(), str::trim);
    PAYMENT_STATUS_VALUES
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, status)| *status)
}

pub fn resolve_client_filters(raw: &ClientsQuery) -> ClientFilters {
    let mut filters = ClientFilters::new();
    if let Some(q) = raw.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        filters = filters.query(q);
    }
    if let Some(active) = resolve_active(raw.active.as_deref()) {
        filters = filters.active(active);
    }
    if let Some(status) = resolve_payment_status(raw.payment.as_deref()) {
        filters = filters.payment(status);
    }
    filters
}

/// Resolves typed text to client ids.
///
/// Text starting with a digit is read as an id: the leading digit run is
/// parsed and anything after it ignored, so `"7 - Ana"` picked from a
/// suggestion list yields `[7]`. Other text matches cached names and emails
/// case-insensitively, keeping cache order. An empty result for non-empty
/// text means nobody matched.
pub fn resolve_client_ids_from_query(text: &str, cache: &ClientCache) -> Vec<ClientId> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end > 0 {
        return text[..digits_end]
            .parse::<i64>()
            .ok()
            .and_then(|id| ClientId::new(id).ok())
            .into_iter()
            .collect();
    }

    let needle = text.to_lowercase();
    cache.with_clients(|clients| {
        clients
            .iter()
            .filter(|client| client.matches_text(&needle))
            .map(|client| client.id)
            .collect()
    })
}

/// What the payments table should fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentQueryPlan {
    /// Fetch with these filters; no client ids means all clients.
    Fetch(PaymentFilters),
    /// Client text matched nobody; show no results without fetching.
    NoMatch,
}

pub fn resolve_payment_filters(
    raw: &PaymentsQuery,
    cache: &ClientCache,
) -> ServiceResult<PaymentQueryPlan> {
    let mut filters = PaymentFilters::new();

    if let Some(from) = parse_optional_date(raw.from.as_deref())? {
        filters = filters.from(from);
    }
    if let Some(to) = parse_optional_date(raw.to.as_deref())? {
        filters = filters.to(to);
    }
    if let Some(status) = resolve_payment_status(raw.state.as_deref()) {
        filters = filters.state(status);
    }

    let text = raw.client.as_deref().map(str::trim).unwrap_or_default();
    if !text.is_empty() {
        let ids = resolve_client_ids_from_query(text, cache);
        if ids.is_empty() {
            log::debug!("Payment client filter `{text}` matched no cached client");
            return Ok(PaymentQueryPlan::NoMatch);
        }
        filters = filters.client_ids(ids);
    }

    Ok(PaymentQueryPlan::Fetch(filters))
}
