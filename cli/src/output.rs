use carelog_core::{Client, EntryTotals, Staff, Theme, TimesheetEntry};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Staff")]
    staff: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Shift")]
    shift: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Km")]
    km: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Synced")]
    synced: String,
}

#[derive(Tabled)]
struct StaffRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Eve")]
    evening: String,
    #[tabled(rename = "Night")]
    night: String,
    #[tabled(rename = "Sleep")]
    sleepover: String,
    #[tabled(rename = "Sat")]
    saturday: String,
    #[tabled(rename = "Sun")]
    sunday: String,
    #[tabled(rename = "PH")]
    public_holiday: String,
    #[tabled(rename = "Km")]
    km: String,
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn header_color(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::FG_CYAN,
        Theme::Light => Color::FG_BLUE,
    }
}

fn render<T: Tabled>(rows: Vec<T>, theme: Theme) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(header_color(theme)));
    table.to_string()
}

pub fn print_entries(entries: &[TimesheetEntry], totals: &EntryTotals, theme: Theme) {
    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    let rows = entries
        .iter()
        .map(|e| EntryRow {
            date: format!("{} ({})", e.date.format("%Y-%m-%d"), e.date.format("%a")),
            id: short_id(&e.id),
            staff: e.staff_name.clone(),
            client: e.client_name.clone(),
            shift: e.shift_type.to_string(),
            time: format!("{}-{}", e.start_time, e.end_time),
            hours: format!("{:.2}", e.hours),
            km: format!("{:.1}", e.km),
            total: money(e.total_earnings),
            status: e.status.to_string(),
            synced: if e.synced_to_cloud { "yes" } else { "no" }.to_string(),
        })
        .collect();

    println!("{}", render::<EntryRow>(rows, theme));
    println!(
        "{} entries, {:.2}h, {:.1} km, ${}",
        totals.count,
        totals.hours,
        totals.km,
        money(totals.earnings)
    );
}

pub fn print_staff(staff: &[Staff], theme: Theme) {
    if staff.is_empty() {
        println!("No staff found.");
        return;
    }

    let rows = staff
        .iter()
        .map(|s| StaffRow {
            id: short_id(&s.id),
            name: s.name.clone(),
            role: s.role.clone(),
            active: if s.active { "yes" } else { "no" }.to_string(),
            day: money(s.rates.day),
            evening: money(s.rates.evening),
            night: money(s.rates.night),
            sleepover: money(s.rates.sleepover),
            saturday: money(s.rates.saturday),
            sunday: money(s.rates.sunday),
            public_holiday: money(s.rates.public_holiday),
            km: money(s.rates.km),
        })
        .collect();

    println!("{}", render::<StaffRow>(rows, theme));
}

pub fn print_clients(clients: &[Client], theme: Theme) {
    if clients.is_empty() {
        println!("No clients found.");
        return;
    }

    let rows = clients
        .iter()
        .map(|c| ClientRow {
            id: short_id(&c.id),
            name: c.name.clone(),
        })
        .collect();

    println!("{}", render::<ClientRow>(rows, theme));
}
