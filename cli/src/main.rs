mod config;
mod logging;
mod output;
mod transport;

use anyhow::{anyhow, Context, Result};
use carelog_core::time::parse_shift_date;
use carelog_core::{
    pull, push, totals, ClockTime, EntryDraft, EntryFilter, EntryPatch, EntryStatus, FileStore,
    PullResult, PushResult, RateCard, RosterService, ShiftType, StaffDraft, StaffPatch, Storage,
    Theme, TimesheetService, TimesheetView,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::{Config, GlobalArgs};
use crate::transport::WebhookTransport;

#[derive(Parser)]
#[command(name = "carelog")]
#[command(about = "Shift timesheets and earnings for support workers", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage staff members and their rate cards
    #[command(subcommand)]
    Staff(StaffCommand),
    /// Manage clients
    #[command(subcommand)]
    Client(ClientCommand),
    /// Log, review and list shifts
    #[command(subcommand)]
    Entry(EntryCommand),
    /// Mirror data to the spreadsheet webhook
    #[command(subcommand)]
    Sync(SyncCommand),
    /// Show or set the table colour theme
    Theme { theme: Option<Theme> },
}

#[derive(Subcommand)]
enum StaffCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        start_date: Option<String>,
    },
    /// Show a rate card, or change the rates given
    Rates {
        staff: String,
        #[command(flatten)]
        rates: RateArgs,
    },
    Update {
        staff: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        #[arg(long)]
        inactive: bool,
    },
    Remove { staff: String },
}

#[derive(clap::Args)]
struct RateArgs {
    #[arg(long)]
    day: Option<f64>,
    #[arg(long)]
    evening: Option<f64>,
    #[arg(long)]
    night: Option<f64>,
    #[arg(long)]
    sleepover: Option<f64>,
    #[arg(long)]
    saturday: Option<f64>,
    #[arg(long)]
    sunday: Option<f64>,
    #[arg(long)]
    public_holiday: Option<f64>,
    #[arg(long)]
    km: Option<f64>,
}

impl RateArgs {
    fn is_empty(&self) -> bool {
        [
            self.day,
            self.evening,
            self.night,
            self.sleepover,
            self.saturday,
            self.sunday,
            self.public_holiday,
            self.km,
        ]
        .iter()
        .all(Option::is_none)
    }

    fn apply(&self, card: RateCard) -> RateCard {
        RateCard {
            day: self.day.unwrap_or(card.day),
            evening: self.evening.unwrap_or(card.evening),
            night: self.night.unwrap_or(card.night),
            sleepover: self.sleepover.unwrap_or(card.sleepover),
            saturday: self.saturday.unwrap_or(card.saturday),
            sunday: self.sunday.unwrap_or(card.sunday),
            public_holiday: self.public_holiday.unwrap_or(card.public_holiday),
            km: self.km.unwrap_or(card.km),
        }
    }
}

#[derive(Subcommand)]
enum ClientCommand {
    List,
    Add { name: String },
    Rename { client: String, name: String },
    Remove { client: String },
}

#[derive(Subcommand)]
enum EntryCommand {
    /// Log a shift (dates: today, yesterday, -3d, sat, 2024-06-01)
    Add {
        #[arg(long)]
        client: String,
        /// Staff member to log for (managers only)
        #[arg(long)]
        staff: Option<String>,
        #[arg(long, default_value = "today", value_parser = parse_shift_date)]
        date: NaiveDate,
        #[arg(long)]
        start: ClockTime,
        #[arg(long)]
        end: ClockTime,
        #[arg(long, default_value = "day")]
        shift: ShiftType,
        #[arg(long, default_value_t = 0.0)]
        km: f64,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change a pending entry
    Edit {
        id: String,
        #[arg(long, value_parser = parse_shift_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        start: Option<ClockTime>,
        #[arg(long)]
        end: Option<ClockTime>,
        #[arg(long)]
        shift: Option<ShiftType>,
        #[arg(long)]
        km: Option<f64>,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Approve { id: String },
    Reject { id: String },
    Delete { id: String },
    List {
        #[arg(long, value_parser = parse_shift_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_shift_date)]
        to: Option<NaiveDate>,
        #[arg(long)]
        status: Option<EntryStatus>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SyncCommand {
    /// Send everything to the webhook
    Push,
    /// Fetch remote entries and merge them in
    Pull,
    Status,
}

/// Finds a record by exact id, unique id prefix, or exact name.
fn resolve<'a>(
    kind: &str,
    input: &str,
    records: impl Iterator<Item = (&'a str, &'a str)> + Clone,
) -> Result<String> {
    let input = input.trim();
    if let Some((id, _)) = records.clone().find(|(id, _)| *id == input) {
        return Ok(id.to_string());
    }

    let by_prefix: Vec<&str> = records
        .clone()
        .filter(|(id, _)| id.starts_with(input))
        .map(|(id, _)| id)
        .collect();
    match by_prefix.as_slice() {
        [id] => return Ok(id.to_string()),
        [_, _, ..] => return Err(anyhow!("{} id '{}' is ambiguous", kind, input)),
        [] => {}
    }

    let by_name: Vec<&str> = records
        .filter(|(_, name)| name.eq_ignore_ascii_case(input))
        .map(|(id, _)| id)
        .collect();
    match by_name.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(anyhow!("{} '{}' not found", kind, input)),
        _ => Err(anyhow!("Several {}s are called '{}'; use the id", kind.to_lowercase(), input)),
    }
}

fn run_staff(cmd: StaffCommand, storage: &Storage<FileStore>, config: &Config, theme: Theme) -> Result<()> {
    let roster = RosterService::new(storage);
    let actor = &config.actor;
    let staff = roster.staff()?;
    let find = |input: &str| resolve("Staff member", input, staff.iter().map(|s| (s.id.as_str(), s.name.as_str())));

    match cmd {
        StaffCommand::List => output::print_staff(&staff, theme),
        StaffCommand::Add { name, role, email, phone, start_date } => {
            let draft = StaffDraft { name, role, email, phone, start_date, rates: None };
            let member = roster.onboard_staff(draft, actor)?;
            println!("Staff added: {} (ID: {})", member.name, member.id);
        }
        StaffCommand::Rates { staff: input, rates } => {
            let id = find(&input)?;
            let member = staff
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| anyhow!("Staff member '{}' not found", input))?;
            if rates.is_empty() {
                output::print_staff(std::slice::from_ref(member), theme);
            } else {
                roster.set_rates(&id, rates.apply(member.rates), actor)?;
                println!("Rates updated for {}", member.name);
            }
        }
        StaffCommand::Update { staff: input, name, role, email, phone, start_date, active, inactive } => {
            let id = find(&input)?;
            let active = match (active, inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let patch = StaffPatch { name, role, email, phone, start_date, active };
            roster.update_staff(&id, patch, actor)?;
            println!("Staff updated: {}", id);
        }
        StaffCommand::Remove { staff: input } => {
            let id = find(&input)?;
            roster.remove_staff(&id, actor)?;
            println!("Staff removed: {}", id);
        }
    }
    Ok(())
}

fn run_client(cmd: ClientCommand, storage: &Storage<FileStore>, config: &Config, theme: Theme) -> Result<()> {
    let roster = RosterService::new(storage);
    let actor = &config.actor;
    let clients = roster.clients()?;
    let find = |input: &str| resolve("Client", input, clients.iter().map(|c| (c.id.as_str(), c.name.as_str())));

    match cmd {
        ClientCommand::List => output::print_clients(&clients, theme),
        ClientCommand::Add { name } => {
            let client = roster.add_client(&name, actor)?;
            println!("Client added: {} (ID: {})", client.name, client.id);
        }
        ClientCommand::Rename { client, name } => {
            let id = find(&client)?;
            roster.rename_client(&id, &name, actor)?;
            println!("Client renamed: {}", name.trim());
        }
        ClientCommand::Remove { client } => {
            let id = find(&client)?;
            roster.remove_client(&id, actor)?;
            println!("Client removed: {}", id);
        }
    }
    Ok(())
}

fn run_entry(cmd: EntryCommand, storage: &Storage<FileStore>, config: &Config, theme: Theme) -> Result<()> {
    let service = TimesheetService::new(storage);
    let actor = &config.actor;
    let entries = service.list()?;
    let find = |input: &str| resolve("Entry", input, entries.iter().map(|e| (e.id.as_str(), e.id.as_str())));

    match cmd {
        EntryCommand::Add { client, staff, date, start, end, shift, km, service: service_type, location, notes } => {
            let clients = storage.load_clients()?;
            let client_id = resolve("Client", &client, clients.iter().map(|c| (c.id.as_str(), c.name.as_str())))?;
            let staff_id = match staff {
                Some(input) => {
                    let members = storage.load_staff()?;
                    Some(resolve("Staff member", &input, members.iter().map(|s| (s.id.as_str(), s.name.as_str())))?)
                }
                None => None,
            };

            let mut draft = EntryDraft::new(date, client_id, start, end);
            draft.staff_id = staff_id;
            draft.shift_type = shift;
            draft.km = km;
            draft.notes = notes;
            if let Some(service_type) = service_type {
                draft.service_type = service_type;
            }
            if let Some(location) = location {
                draft.location = location;
            }

            let entry = service.create(draft, actor)?;
            println!(
                "Entry logged: {} {} for {} ({:.2}h, ${:.2})",
                entry.date, entry.staff_name, entry.client_name, entry.hours, entry.total_earnings
            );
            println!("  ID: {}", entry.id);
        }
        EntryCommand::Edit { id, date, start, end, shift, km, service: service_type, location, notes } => {
            let id = find(&id)?;
            let patch = EntryPatch {
                date,
                service_type,
                shift_type: shift,
                location,
                start_time: start,
                end_time: end,
                km,
                notes,
            };
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let entry = service.edit(&id, patch, actor)?;
            println!("Entry updated: {:.2}h, ${:.2}", entry.hours, entry.total_earnings);
        }
        EntryCommand::Approve { id } => {
            let id = find(&id)?;
            service.set_status(&id, EntryStatus::Approved, actor)?;
            println!("Entry approved: {}", id);
        }
        EntryCommand::Reject { id } => {
            let id = find(&id)?;
            service.set_status(&id, EntryStatus::Rejected, actor)?;
            println!("Entry rejected: {}", id);
        }
        EntryCommand::Delete { id } => {
            let id = find(&id)?;
            service.delete(&id, actor)?;
            println!("Entry deleted: {}", id);
        }
        EntryCommand::List { from, to, status, json } => {
            let filter = EntryFilter { from, to, status };
            let visible = TimesheetView::new(storage).list(actor, &filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                output::print_entries(&visible, &totals(&visible), theme);
            }
        }
    }
    Ok(())
}

async fn run_sync(cmd: SyncCommand, storage: &Storage<FileStore>, config: &Config) -> Result<()> {
    let status = storage.load_sync_status()?;

    match cmd {
        SyncCommand::Status => {
            let fmt = |at: Option<chrono::DateTime<chrono::Utc>>| {
                at.map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string())
            };
            let unsynced = storage.load_entries()?.iter().filter(|e| !e.synced_to_cloud).count();
            println!("Last push:  {}", fmt(status.last_push_at));
            println!("Last pull:  {}", fmt(status.last_pull_at));
            println!("Pending:    {}", if status.pending { "yes" } else { "no" });
            println!("Unsynced:   {} entries", unsynced);
            println!("Webhook:    {}", config.webhook_url.as_deref().unwrap_or("not configured"));
        }
        SyncCommand::Push => {
            let transport = WebhookTransport::new(config.require_webhook()?.to_string(), config.sync_timeout)?;
            let entries = storage.load_entries()?;
            let staff = storage.load_staff()?;
            let clients = storage.load_clients()?;

            let outcome = push(&transport, &entries, &staff, &clients, status).await;
            match outcome.result {
                PushResult::Sent => {
                    storage.save_entries(&outcome.entries)?;
                    storage.save_sync_status(&outcome.status)?;
                    println!("Pushed {} entries, {} staff, {} clients.", entries.len(), staff.len(), clients.len());
                }
                PushResult::Failed(reason) => {
                    return Err(anyhow!("Push failed: {}", reason));
                }
            }
        }
        SyncCommand::Pull => {
            let transport = WebhookTransport::new(config.require_webhook()?.to_string(), config.sync_timeout)?;
            let entries = storage.load_entries()?;
            let staff = storage.load_staff()?;

            let outcome = pull(&transport, &entries, &staff, &config.actor, status).await;
            match outcome.result {
                PullResult::NoData => println!("No data received; nothing changed."),
                PullResult::UpToDate => {
                    storage.save_sync_status(&outcome.status)?;
                    println!("Already up to date.");
                }
                PullResult::Added(n) => {
                    storage.save_entries(&outcome.entries)?;
                    storage.save_sync_status(&outcome.status)?;
                    println!("Merged {} new entries.", n);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();
    let config = Config::from_args(cli.global);
    let store = FileStore::new(config.data_dir.clone()).context("Failed to open data directory")?;
    let storage = Storage::new(store);
    let theme = storage.load_theme()?;

    match cli.command {
        Commands::Staff(cmd) => run_staff(cmd, &storage, &config, theme),
        Commands::Client(cmd) => run_client(cmd, &storage, &config, theme),
        Commands::Entry(cmd) => run_entry(cmd, &storage, &config, theme),
        Commands::Sync(cmd) => run_sync(cmd, &storage, &config).await,
        Commands::Theme { theme: Some(next) } => {
            storage.save_theme(next)?;
            println!("Theme set to {}", next);
            Ok(())
        }
        Commands::Theme { theme: None } => {
            println!("{}", theme);
            Ok(())
        }
    }
}
