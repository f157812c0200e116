//! State of one operator session: repository, client cache, and the current
//! members and payments tables.
//!
//! List loads can overlap (a slow search followed by a quick one). Each load
//! takes a ticket from its [`RequestSequence`] and commits its result only if
//! no newer load of the same table was started in the meantime; results of
//! superseded loads are dropped.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;

use crate::cache::ClientCache;
use crate::domain::client::Client;
use crate::domain::filters::ClientFilters;
use crate::domain::payment::Payment;
use crate::domain::types::{ClientId, PaymentId};
use crate::dto::clients::{ClientsQuery, ClientsView};
use crate::dto::payments::{PaymentsQuery, PaymentsView};
use crate::forms::clients::ClientForm;
use crate::forms::payments::PaymentForm;
use crate::repository::{ClientReader, ClientWriter, PaymentReader, PaymentWriter};
use crate::services::clients::{self, ClientCommand};
use crate::services::filters::{PaymentQueryPlan, resolve_client_filters, resolve_payment_filters};
use crate::services::payments::{self, Confirm, VoidOutcome};
use crate::services::ServiceResult;

/// Position of a load in its table's request order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Monotonic ticket counter for one table.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: Cell<u64>,
}

impl RequestSequence {
    pub fn issue(&self) -> RequestTicket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        RequestTicket(next)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.get() == ticket.0
    }
}

/// Whether a finished load reached the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed,
    /// A newer load was started; this result was dropped.
    Superseded,
}

pub struct AdminSession<R> {
    repo: R,
    cache: ClientCache,
    page_size: usize,
    client_requests: RequestSequence,
    payment_requests: RequestSequence,
    clients_query: RefCell<ClientsQuery>,
    payments_query: RefCell<PaymentsQuery>,
    clients_view: RefCell<Option<ClientsView>>,
    payments_view: RefCell<Option<PaymentsView>>,
}

impl<R> AdminSession<R> {
    pub fn new(repo: R, page_size: usize) -> Self {
        Self {
            repo,
            cache: ClientCache::new(),
            page_size,
            client_requests: RequestSequence::default(),
            payment_requests: RequestSequence::default(),
            clients_query: RefCell::default(),
            payments_query: RefCell::default(),
            clients_view: RefCell::default(),
            payments_view: RefCell::default(),
        }
    }

    /// Seeds the members filters that reloads reuse.
    pub fn with_clients_query(self, raw: ClientsQuery) -> Self {
        self.clients_query.replace(raw);
        self
    }

    /// Seeds the payments filters that reloads reuse.
    pub fn with_payments_query(self, raw: PaymentsQuery) -> Self {
        self.payments_query.replace(raw);
        self
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn cache(&self) -> &ClientCache {
        &self.cache
    }

    pub fn clients_view(&self) -> Option<ClientsView> {
        self.clients_view.borrow().clone()
    }

    pub fn payments_view(&self) -> Option<PaymentsView> {
        self.payments_view.borrow().clone()
    }

    fn commit_clients(&self, ticket: RequestTicket, view: ClientsView) -> LoadOutcome {
        if !self.client_requests.is_current(ticket) {
            log::debug!("Dropping superseded clients result {ticket:?}");
            return LoadOutcome::Superseded;
        }
        self.clients_view.replace(Some(view));
        LoadOutcome::Committed
    }

    fn commit_payments(&self, ticket: RequestTicket, view: PaymentsView) -> LoadOutcome {
        if !self.payment_requests.is_current(ticket) {
            log::debug!("Dropping superseded payments result {ticket:?}");
            return LoadOutcome::Superseded;
        }
        self.payments_view.replace(Some(view));
        LoadOutcome::Committed
    }
}

impl<R: ClientReader> AdminSession<R> {
    /// Loads the members table; a failure is committed as a failed table and
    /// also returned.
    pub async fn load_clients(
        &self,
        raw: ClientsQuery,
        today: NaiveDate,
    ) -> ServiceResult<LoadOutcome> {
        let ticket = self.client_requests.issue();
        let filters = resolve_client_filters(&raw);
        self.clients_query.replace(raw);

        match clients::fetch_clients(&self.repo, &filters).await {
            Ok(list) => {
                if !self.client_requests.is_current(ticket) {
                    log::debug!("Dropping superseded clients result {ticket:?}");
                    return Ok(LoadOutcome::Superseded);
                }
                let view =
                    ClientsView::loaded(&list, today, filters != ClientFilters::default());
                self.cache.replace(list);
                Ok(self.commit_clients(ticket, view))
            }
            Err(err) => {
                if self.commit_clients(ticket, ClientsView::failed(err.user_message()))
                    == LoadOutcome::Superseded
                {
                    return Ok(LoadOutcome::Superseded);
                }
                Err(err)
            }
        }
    }

    /// Repeats the last members load.
    pub async fn reload_clients(&self, today: NaiveDate) -> ServiceResult<LoadOutcome> {
        let raw = self.clients_query.borrow().clone();
        self.load_clients(raw, today).await
    }

    /// Reload after a successful mutation. Only an ended session is an error;
    /// other failures already show as the failed table.
    async fn refresh_clients(&self, today: NaiveDate) -> ServiceResult<()> {
        match self.reload_clients(today).await {
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                log::warn!("Members reload after update failed: {err}");
                Ok(())
            }
            Ok(_) => Ok(()),
        }
    }

    /// Fills an empty cache with the unfiltered members list.
    pub async fn prime_cache(&self) -> ServiceResult<()> {
        if !self.cache.is_empty() {
            return Ok(());
        }
        let list = clients::fetch_clients(&self.repo, &ClientFilters::new()).await?;
        self.cache.replace(list);
        Ok(())
    }
}

impl<R: ClientWriter + ClientReader> AdminSession<R> {
    pub async fn register_client(
        &self,
        form: ClientForm,
        today: NaiveDate,
    ) -> ServiceResult<Client> {
        let client = clients::register_client(&self.repo, form, today).await?;
        self.refresh_clients(today).await?;
        Ok(client)
    }

    /// Runs a row action and refreshes the members table.
    pub async fn execute(
        &self,
        id: ClientId,
        command: ClientCommand,
        today: NaiveDate,
    ) -> ServiceResult<&'static str> {
        clients::execute_command(&self.repo, id, &command).await?;
        self.refresh_clients(today).await?;
        Ok(command.success_message())
    }
}

impl<R: ClientReader + PaymentReader> AdminSession<R> {
    /// Loads the payments table.
    ///
    /// Client text that is not an id needs the members list to resolve, so
    /// the cache is primed first when empty.
    pub async fn load_payments(&self, raw: PaymentsQuery) -> ServiceResult<LoadOutcome> {
        let ticket = self.payment_requests.issue();
        self.payments_query.replace(raw.clone());

        if needs_name_lookup(raw.client.as_deref()) {
            self.prime_cache().await?;
        }

        let filters = match resolve_payment_filters(&raw, &self.cache)? {
            PaymentQueryPlan::NoMatch => {
                return Ok(self.commit_payments(ticket, PaymentsView::no_results()));
            }
            PaymentQueryPlan::Fetch(filters) => filters,
        };

        let page = raw.page.unwrap_or(1).max(1);
        match payments::load_payments(&self.repo, &filters, page, self.page_size).await {
            Ok(result) => {
                let view =
                    payments::payments_view(&filters, page, self.page_size, result, &self.cache);
                Ok(self.commit_payments(ticket, view))
            }
            Err(err) => {
                if self.commit_payments(ticket, PaymentsView::failed(err.user_message()))
                    == LoadOutcome::Superseded
                {
                    return Ok(LoadOutcome::Superseded);
                }
                Err(err)
            }
        }
    }

    pub async fn reload_payments(&self) -> ServiceResult<LoadOutcome> {
        let raw = self.payments_query.borrow().clone();
        self.load_payments(raw).await
    }
}

impl<R: ClientReader + PaymentReader + PaymentWriter> AdminSession<R> {
    pub async fn register_payment(
        &self,
        form: PaymentForm,
        today: NaiveDate,
    ) -> ServiceResult<Payment> {
        let payment = payments::register_payment(&self.repo, form, today).await?;
        match self.reload_payments().await {
            Err(err) if err.is_auth() => return Err(err),
            Err(err) => log::warn!("Payments reload after registration failed: {err}"),
            Ok(_) => {}
        }
        Ok(payment)
    }

    /// Runs the void dialog; a successful void reloads the payments table
    /// with the query in effect.
    ///
    /// The void stands even when the reload fails; the table then shows the
    /// failure.
    pub async fn void_payment<C: Confirm>(
        &self,
        id: PaymentId,
        reason: Option<&str>,
        confirm: &C,
    ) -> ServiceResult<VoidOutcome> {
        let outcome = payments::void_payment(&self.repo, confirm, id, reason).await?;

        if let VoidOutcome::Voided = outcome {
            match self.reload_payments().await {
                Err(err) if err.is_auth() => return Err(err),
                Err(err) => log::warn!("Payments reload after void of {id} failed: {err}"),
                Ok(_) => {}
            }
        }
        Ok(outcome)
    }
}

fn needs_name_lookup(client: Option<&str>) -> bool {
    client
        .map(str::trim)
        .and_then(|text| text.chars().next())
        .is_some_and(|first| !first.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::task::Poll;

    use super::*;
    use crate::domain::client::tests::{client, date};
    use crate::domain::payment::tests::payment;
    use crate::dto::ListState;
    use crate::repository::errors::{RepositoryError, RepositoryResult};
    use crate::repository::test::TestRepository;
    use crate::repository::{PaymentListQuery, PaymentPage};

    /// Yields to the executor `times` times before finishing.
    async fn yield_times(times: usize) {
        let mut left = times;
        poll_fn(|cx| {
            if left == 0 {
                Poll::Ready(())
            } else {
                left -= 1;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        })
        .await
    }

    /// Searches for "lento" answer after other requests.
    struct SlowSearch(TestRepository);

    impl ClientReader for SlowSearch {
        async fn list_clients(&self, filters: &ClientFilters) -> RepositoryResult<Vec<Client>> {
            if filters.text() == Some("lento") {
                yield_times(3).await;
            }
            self.0.list_clients(filters).await
        }
    }

    impl PaymentReader for SlowSearch {
        async fn list_payments(&self, query: &PaymentListQuery) -> RepositoryResult<PaymentPage> {
            if query.page > 0 {
                yield_times(3).await;
            }
            self.0.list_payments(query).await
        }
    }

    struct Answer(bool);

    impl Confirm for Answer {
        async fn confirm(&self, _prompt: &str) -> bool {
            self.0
        }
    }

    fn members() -> Vec<Client> {
        vec![
            client(1, "Ana", "Pérez", "ana@mail.com"),
            client(2, "Juan", "García", "juan@mail.com"),
        ]
    }

    fn search(text: &str) -> ClientsQuery {
        ClientsQuery {
            q: Some(text.into()),
            ..ClientsQuery::default()
        }
    }

    #[test]
    fn only_the_latest_ticket_is_current() {
        let sequence = RequestSequence::default();
        let first = sequence.issue();
        let second = sequence.issue();
        assert!(first < second);
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }

    #[actix_web::test]
    async fn stale_clients_result_is_not_committed() {
        let session = AdminSession::new(SlowSearch(TestRepository::with_clients(members())), 50);
        let today = date(2024, 1, 1);

        let (slow, fast) = futures::join!(
            session.load_clients(search("lento"), today),
            session.load_clients(search("juan"), today),
        );

        assert_eq!(slow.unwrap(), LoadOutcome::Superseded);
        assert_eq!(fast.unwrap(), LoadOutcome::Committed);
        let view = session.clients_view().unwrap();
        assert_eq!(view.clients.len(), 1);
        assert_eq!(view.clients[0].first_name, "Juan");
        assert_eq!(session.cache().len(), 1);
    }

    #[actix_web::test]
    async fn stale_payments_result_is_not_committed() {
        let repo = TestRepository::with_payments(vec![payment(1, 1, Some(date(2024, 1, 1)))]);
        let session = AdminSession::new(SlowSearch(repo), 50);
        let second_page = PaymentsQuery {
            page: Some(2),
            ..PaymentsQuery::default()
        };

        let (slow, fast) = futures::join!(
            session.load_payments(second_page),
            session.load_payments(PaymentsQuery::default()),
        );

        assert_eq!(slow.unwrap(), LoadOutcome::Superseded);
        assert_eq!(fast.unwrap(), LoadOutcome::Committed);
        assert_eq!(session.payments_view().unwrap().pager.unwrap().page, 1);
    }

    #[actix_web::test]
    async fn failed_load_shows_failed_table() {
        let repo = TestRepository::with_clients(members());
        repo.fail_next
            .replace(Some(RepositoryError::Network("down".into())));
        let session = AdminSession::new(repo, 50);

        assert!(session
            .load_clients(ClientsQuery::default(), date(2024, 1, 1))
            .await
            .is_err());

        let view = session.clients_view().unwrap();
        assert_eq!(view.state, ListState::Failed);
        assert_eq!(
            view.message.as_deref(),
            Some("Error de red. Intente nuevamente.")
        );
    }

    #[actix_web::test]
    async fn listing_replaces_the_cache() {
        let repo = TestRepository::with_clients(vec![
            client(1, "Ana", "Pérez", "ana@mail.com"),
            Client {
                active: false,
                ..client(2, "Juan", "García", "juan@mail.com")
            },
        ]);
        let session = AdminSession::new(repo, 50);
        session
            .cache()
            .replace(vec![client(9, "Old", "Entry", "old@mail.com")]);
        let raw = ClientsQuery {
            active: Some("Activo".into()),
            ..ClientsQuery::default()
        };

        session.load_clients(raw, date(2024, 1, 1)).await.unwrap();

        assert_eq!(session.clients_view().unwrap().total, 1);
        assert!(session.cache().find(ClientId::new(9).unwrap()).is_none());
        assert_eq!(
            session.repo().calls(),
            vec![r#"list_clients [("active", "true")]"#.to_string()]
        );
    }

    #[actix_web::test]
    async fn failed_listing_keeps_the_cache() {
        let repo = TestRepository::with_clients(members());
        repo.fail_next
            .replace(Some(RepositoryError::Network("down".into())));
        let session = AdminSession::new(repo, 50);
        session
            .cache()
            .replace(vec![client(9, "Old", "Entry", "old@mail.com")]);

        let _ = session
            .load_clients(ClientsQuery::default(), date(2024, 1, 1))
            .await;

        assert_eq!(session.cache().len(), 1);
    }

    #[actix_web::test]
    async fn empty_filtered_listing_is_no_results() {
        let session = AdminSession::new(TestRepository::with_clients(members()), 50);

        session
            .load_clients(search("zzz"), date(2024, 1, 1))
            .await
            .unwrap();

        let view = session.clients_view().unwrap();
        assert_eq!(view.state, ListState::Empty);
        assert_eq!(
            view.message.as_deref(),
            Some("No se encontraron clientes con esos filtros.")
        );
    }

    #[actix_web::test]
    async fn unmatched_client_text_fetches_no_payments() {
        let session = AdminSession::new(TestRepository::with_clients(members()), 50);
        let raw = PaymentsQuery {
            client: Some("nadie".into()),
            ..PaymentsQuery::default()
        };

        session.load_payments(raw).await.unwrap();

        assert_eq!(session.payments_view().unwrap().state, ListState::Empty);
        assert_eq!(session.repo().calls(), vec!["list_clients []".to_string()]);
    }

    #[actix_web::test]
    async fn registering_a_payment_reloads_with_current_filters() {
        let repo = TestRepository::with_clients(members());
        repo.payments
            .replace(vec![payment(1, 1, Some(date(2024, 1, 1)))]);
        let session = AdminSession::new(repo, 50).with_payments_query(PaymentsQuery {
            client: Some("1".into()),
            ..PaymentsQuery::default()
        });
        let form = PaymentForm {
            client_id: 1,
            amount: 1500.0,
            method: crate::domain::payment::PaymentMethod::Cash,
            payment_date: Some(date(2024, 2, 1)),
            duration_days: 30,
        };

        session.register_payment(form, date(2024, 2, 1)).await.unwrap();

        let calls = session.repo().calls();
        assert_eq!(calls.last().map(String::as_str), Some("list_payments 1 page=0"));
        assert_eq!(session.payments_view().unwrap().payments.len(), 2);
    }

    #[actix_web::test]
    async fn name_filter_primes_the_cache() {
        let repo = TestRepository::with_clients(members());
        repo.payments.replace(vec![
            payment(1, 1, Some(date(2024, 1, 1))),
            payment(2, 2, Some(date(2024, 1, 2))),
        ]);
        let session = AdminSession::new(repo, 50);
        let raw = PaymentsQuery {
            client: Some("juan".into()),
            ..PaymentsQuery::default()
        };

        session.load_payments(raw).await.unwrap();

        let view = session.payments_view().unwrap();
        assert_eq!(view.payments.len(), 1);
        assert_eq!(view.payments[0].client_name, "Juan García");
        assert_eq!(session.repo().calls()[0], "list_clients []");
    }

    #[actix_web::test]
    async fn commands_refresh_the_members_table() {
        let session = AdminSession::new(TestRepository::with_clients(members()), 50);
        let today = date(2024, 1, 1);
        session
            .load_clients(ClientsQuery::default(), today)
            .await
            .unwrap();

        let message = session
            .execute(ClientId::new(2).unwrap(), ClientCommand::Deactivate, today)
            .await
            .unwrap();

        assert_eq!(message, "Cliente desactivado.");
        let view = session.clients_view().unwrap();
        assert_eq!(view.inactive, 1);
    }

    #[actix_web::test]
    async fn void_reloads_the_payments_table() {
        let repo = TestRepository::with_payments(vec![
            payment(1, 1, Some(date(2024, 1, 1))),
            payment(2, 1, Some(date(2024, 1, 2))),
        ]);
        let session = AdminSession::new(repo, 50);
        session.load_payments(PaymentsQuery::default()).await.unwrap();

        let outcome = session
            .void_payment(PaymentId::new(2).unwrap(), Some("duplicado"), &Answer(true))
            .await
            .unwrap();

        assert!(matches!(outcome, VoidOutcome::Voided));
        let view = session.payments_view().unwrap();
        assert!(view.payments.iter().any(|row| row.id.get() == 2 && row.voided));
    }

    #[actix_web::test]
    async fn void_with_a_name_filter_reloads_only_that_client() {
        let repo = TestRepository::with_clients(members());
        repo.payments.replace(vec![
            payment(1, 1, Some(date(2024, 1, 1))),
            payment(2, 2, Some(date(2024, 1, 2))),
            payment(3, 2, Some(date(2024, 1, 3))),
        ]);
        let session = AdminSession::new(repo, 50).with_payments_query(PaymentsQuery {
            client: Some("juan".into()),
            ..PaymentsQuery::default()
        });

        let outcome = session
            .void_payment(PaymentId::new(2).unwrap(), None, &Answer(true))
            .await
            .unwrap();

        assert!(matches!(outcome, VoidOutcome::Voided));
        assert_eq!(
            session.repo().calls(),
            vec![
                "void_payment 2 None".to_string(),
                "list_clients []".to_string(),
                "list_payments 2 page=0".to_string(),
            ]
        );
        let view = session.payments_view().unwrap();
        assert_eq!(view.payments.len(), 2);
        assert!(view.payments.iter().all(|row| row.client_name == "Juan García"));
    }

    #[actix_web::test]
    async fn void_stands_when_the_reload_fails() {
        let repo = TestRepository::with_clients(members());
        repo.payments
            .replace(vec![payment(1, 2, Some(date(2024, 1, 1)))]);
        repo.failing_clients.replace(vec![ClientId::new(2).unwrap()]);
        let session = AdminSession::new(repo, 50).with_payments_query(PaymentsQuery {
            client: Some("2".into()),
            ..PaymentsQuery::default()
        });

        let outcome = session
            .void_payment(PaymentId::new(1).unwrap(), None, &Answer(true))
            .await
            .unwrap();

        assert_eq!(outcome.state(), crate::services::payments::VoidState::Voided);
        assert!(session.repo().payments.borrow()[0].voided);
        assert_eq!(session.payments_view().unwrap().state, ListState::Failed);
    }
}
