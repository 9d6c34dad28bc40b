pub mod timesheet_view;
