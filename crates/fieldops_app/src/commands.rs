use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use fieldops_client::{
    export_work_report, save_export, Assignor, AssignorPayload, Entity, EnvelopeTable,
    ExportError, FileSessionStore, ListController, ListSource, PmUpdate, ReqwestFetcher, Resource, RowMutator,
    SessionStore, User, UserPayload, WorkAssignment, TOKEN_KEY,
};
use fieldops_core::{
    normalize_date, DeleteConfirmation, FailureKind, FetchError, FilterKey, FilterSet,
    ListViewModel,
};
use fieldops_logging::{ops_info, ops_warn};
use serde::de::DeserializeOwned;

use crate::cli::{
    AssignorCommand, Command, DeleteArgs, PageArgs, UserArgs, UserCommand, WorkCommand,
    WorkFilterArgs,
};
use crate::config::AppConfig;
use crate::render::{render_images, render_page, TableRow};

const SIGN_IN_HINT: &str = "Not signed in or session expired. Run `fieldops login` first.";

/// Shared handles every command works through.
pub struct App {
    config: AppConfig,
    backend: Arc<ReqwestFetcher>,
    session: Arc<dyn SessionStore>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let backend = ReqwestFetcher::new(config.client_settings(), EnvelopeTable::default())
            .context("failed to build HTTP client")?;
        let session = FileSessionStore::new(config.session_path.clone());
        Ok(Self {
            config,
            backend: Arc::new(backend),
            session: Arc::new(session),
        })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login { token } => self.login(token),
            Command::Logout => {
                self.session.clear_token()?;
                println!("Signed out.");
                Ok(())
            }
            Command::Assignors { action } => self.assignors(action).await,
            Command::Users { action } => self.users(action).await,
            Command::Works { action } => self.works(action).await,
        }
    }

    fn login(&self, token: Option<String>) -> Result<()> {
        let token = match token {
            Some(token) => token,
            None => {
                let mut line = String::new();
                io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .context("failed to read token from stdin")?;
                line
            }
        };
        let token = token.trim();
        if token.is_empty() {
            bail!("token must not be empty");
        }
        self.session.set(TOKEN_KEY, token)?;
        ops_info!("Stored session token");
        println!("Signed in.");
        Ok(())
    }

    async fn assignors(&self, action: AssignorCommand) -> Result<()> {
        let rows = self.mutator::<Assignor>(Resource::Assignors);
        match action {
            AssignorCommand::List(page) => {
                self.show_page::<Assignor>(Resource::Assignors, &page).await
            }
            AssignorCommand::Add { name, unique_id } => {
                let payload = AssignorPayload {
                    assignor: name,
                    unique_assignor_id: unique_id,
                };
                let created = rows.create(&payload).await.map_err(|err| self.failed(err))?;
                println!("Created assignor {}.", describe(&created));
                self.show_created(Resource::Assignors, created).await
            }
            AssignorCommand::Edit {
                id,
                name,
                unique_id,
            } => {
                let payload = AssignorPayload {
                    assignor: name,
                    unique_assignor_id: unique_id,
                };
                rows.update(Some(&id), &payload)
                    .await
                    .map_err(|err| self.failed(err))?;
                println!("Updated assignor {id}.");
                self.show_page::<Assignor>(Resource::Assignors, &PageArgs { page: 1 })
                    .await
            }
            AssignorCommand::Delete(args) => self.delete(&rows, args).await,
        }
    }

    async fn users(&self, action: UserCommand) -> Result<()> {
        let rows = self.mutator::<User>(Resource::Users);
        match action {
            UserCommand::List(page) => self.show_page::<User>(Resource::Users, &page).await,
            UserCommand::Add(user) => {
                let created = rows
                    .create(&user_payload(user))
                    .await
                    .map_err(|err| self.failed(err))?;
                println!("Created user {}.", describe(&created));
                self.show_created(Resource::Users, created).await
            }
            UserCommand::Edit { id, user } => {
                rows.update(Some(&id), &user_payload(user))
                    .await
                    .map_err(|err| self.failed(err))?;
                println!("Updated user {id}.");
                self.show_page::<User>(Resource::Users, &PageArgs { page: 1 })
                    .await
            }
            UserCommand::Delete(args) => self.delete(&rows, args).await,
        }
    }

    async fn works(&self, action: WorkCommand) -> Result<()> {
        match action {
            WorkCommand::List(args) => {
                let view = self
                    .load_page::<WorkAssignment>(
                        Resource::Assignments,
                        work_filters(&args)?,
                        args.page.page_index(),
                    )
                    .await?;
                print!("{}", render_page(&view));
                Ok(())
            }
            WorkCommand::Export { filters, out } => {
                let view = self
                    .load_page::<WorkAssignment>(
                        Resource::Assignments,
                        work_filters(&filters)?,
                        filters.page.page_index(),
                    )
                    .await?;
                let options = self.config.export_options()?;
                let export = match export_work_report(&view.items, &options) {
                    Ok(export) => export,
                    Err(err @ ExportError::Empty) => {
                        println!("{err}");
                        return Ok(());
                    }
                    Err(err) => {
                        return Err(anyhow::Error::new(err).context("failed to build CSV"))
                    }
                };
                let path = save_export(&out, &export).context("failed to save CSV")?;
                println!("Wrote {} rows to {}.", export.row_count, path.display());
                Ok(())
            }
            WorkCommand::Images { id, filters } => {
                let view = self
                    .load_page::<WorkAssignment>(
                        Resource::Assignments,
                        work_filters(&filters)?,
                        filters.page.page_index(),
                    )
                    .await?;
                let Some(row) = find_row(&view.items, &id) else {
                    bail!(
                        "assignment {id} is not on page {}; pass the filters and --page it was listed with",
                        filters.page.page_index() + 1
                    );
                };
                print!("{}", render_images(row));
                Ok(())
            }
            WorkCommand::Pm {
                id,
                site_id,
                comments,
            } => {
                let update = PmUpdate {
                    pm_site_id: site_id,
                    pm_comments: comments,
                };
                if update.is_empty() {
                    bail!("nothing to update; pass --site-id and/or --comments");
                }
                self.mutator::<WorkAssignment>(Resource::Assignments)
                    .update(Some(&id), &update)
                    .await
                    .map_err(|err| self.failed(err))?;
                println!("Updated assignment {id}.");
                Ok(())
            }
        }
    }

    /// Asks before deleting unless `--yes` was given, naming the row when it
    /// is on the first page, then shows that page again.
    async fn delete<T>(&self, rows: &RowMutator<T>, args: DeleteArgs) -> Result<()>
    where
        T: DeserializeOwned + Clone + Entity + TableRow,
    {
        let mut controller = self.controller::<T>(rows.resource());
        controller.load().await;
        let view = self.settle(&controller)?;

        let mut confirmation = DeleteConfirmation::default();
        let label = find_row(&view.items, &args.id).and_then(row_label);
        confirmation.request(args.id, label);

        let question = delete_question(rows.resource(), &confirmation);
        if !args.yes && !prompt_yes(&question)? {
            confirmation.cancel();
            println!("Cancelled.");
            return Ok(());
        }

        let id = confirmation.confirm();
        rows.delete(id.as_deref())
            .await
            .map_err(|err| self.failed(err))?;
        println!("Deleted {} {}.", rows.resource(), id.unwrap_or_default());

        controller.refresh().await;
        print!("{}", render_page(&self.settle(&controller)?));
        Ok(())
    }

    async fn show_page<T: DeserializeOwned + Clone + TableRow>(
        &self,
        resource: Resource,
        page: &PageArgs,
    ) -> Result<()> {
        let view = self
            .load_page::<T>(resource, FilterSet::new(), page.page_index())
            .await?;
        print!("{}", render_page(&view));
        Ok(())
    }

    async fn show_created<T: DeserializeOwned + Clone + TableRow>(
        &self,
        resource: Resource,
        created: T,
    ) -> Result<()> {
        let mut controller = self.controller::<T>(resource);
        controller.item_created(created).await;
        let view = self.settle(&controller)?;
        print!("{}", render_page(&view));
        Ok(())
    }

    async fn load_page<T: DeserializeOwned + Clone>(
        &self,
        resource: Resource,
        filters: FilterSet,
        page_index: u64,
    ) -> Result<ListViewModel<T>> {
        let mut controller = self
            .controller::<T>(resource)
            .with_selection(filters, page_index);
        controller.load().await;
        self.settle(&controller)
    }

    fn controller<T: DeserializeOwned + Clone>(&self, resource: Resource) -> ListController<T> {
        let source: Arc<dyn ListSource> = self.backend.clone();
        ListController::new(resource, source, self.session.clone())
            .with_page_size(self.config.page_size)
    }

    fn settle<T: DeserializeOwned + Clone>(
        &self,
        controller: &ListController<T>,
    ) -> Result<ListViewModel<T>> {
        if controller.sign_in_required() {
            bail!(SIGN_IN_HINT);
        }
        let view = controller.view();
        if let Some(message) = &view.error {
            bail!("{message}");
        }
        Ok(view)
    }

    fn mutator<T: DeserializeOwned>(&self, resource: Resource) -> RowMutator<T> {
        RowMutator::new(self.backend.clone(), self.session.clone(), resource)
    }

    /// Mutation failures that invalidate the session clear it, the same way list fetches do.
    fn failed(&self, err: FetchError) -> anyhow::Error {
        match err.kind {
            FailureKind::Unauthorized => {
                if let Err(clear_err) = self.session.clear_token() {
                    ops_warn!("Failed to clear session: {}", clear_err);
                }
                anyhow::anyhow!(SIGN_IN_HINT)
            }
            FailureKind::Unauthenticated => anyhow::anyhow!(SIGN_IN_HINT),
            _ => err.into(),
        }
    }
}

fn find_row<'a, T: Entity>(rows: &'a [T], id: &str) -> Option<&'a T> {
    rows.iter().find(|row| row.id() == id)
}

/// The row's display label, unless it is blank or just repeats the id.
fn row_label<T: Entity>(row: &T) -> Option<String> {
    let label = row.label().trim();
    (!label.is_empty() && label != row.id()).then(|| label.to_string())
}

fn describe<T: Entity>(row: &T) -> String {
    match row_label(row) {
        Some(label) => format!("{label} ({})", row.id()),
        None => row.id().to_string(),
    }
}

fn delete_question(resource: Resource, confirmation: &DeleteConfirmation) -> String {
    let id = confirmation.pending_id().unwrap_or_default();
    match confirmation.label() {
        Some(label) => format!("Delete {resource} {id} ({label})? [y/N] "),
        None => format!("Delete {resource} {id}? [y/N] "),
    }
}

fn user_payload(user: UserArgs) -> UserPayload {
    UserPayload {
        user_name: user.name,
        phone_number: user.phone,
        device_id: user.device_id,
        unique_category_id: user.category,
    }
}

/// Date filters are normalized here so a bad date fails before any request.
fn work_filters(args: &WorkFilterArgs) -> Result<FilterSet> {
    let mut filters = FilterSet::new();
    filters.set(FilterKey::AssignorId, args.assignor.clone());
    filters.set(FilterKey::UserId, args.user.clone());
    filters.set(FilterKey::SiteId, args.site.clone());
    for (key, value) in [
        (FilterKey::StartDate, &args.start),
        (FilterKey::EndDate, &args.end),
    ] {
        let value = match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => Some(normalize_date(raw).map_err(|err| {
                FetchError::new(FailureKind::InvalidFilter, err.to_string())
            })?),
            None => None,
        };
        filters.set(key, value);
    }
    Ok(filters)
}

fn prompt_yes(question: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    stdout.write_all(question.as_bytes())?;
    stdout.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
