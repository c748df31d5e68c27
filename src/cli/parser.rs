use clap::{Parser, Subcommand};

/// Command-line interface definition for punchsync
/// Pulls punches from biometric time clocks into the employee checkin ledger
#[derive(Parser)]
#[command(
    name = "punchsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sync attendance punches from biometric time clocks into employee checkins",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage biometric devices
    Device {
        #[command(subcommand)]
        action: DeviceCommands,
    },

    /// Manage shift types
    Shift {
        #[command(subcommand)]
        action: ShiftCommands,
    },

    /// Manage employees and checkins of the local ledger
    Employee {
        #[command(subcommand)]
        action: EmployeeCommands,
    },

    /// Run one sync cycle over all devices
    Sync {
        #[arg(
            long = "timeout",
            value_name = "SECS",
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Connect/read timeout per device in seconds (default 30)"
        )]
        timeout: Option<u64>,

        #[arg(
            long = "since",
            value_name = "YYYY-MM-DD",
            help = "Ignore punches before this day (overrides import_start_date)"
        )]
        since: Option<String>,
    },

    /// Show last sync and last error of every device
    Status {
        #[arg(long = "json", help = "Print status as JSON")]
        json: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "errors", help = "Only error rows")]
        errors: bool,

        #[arg(long = "device", value_name = "ID", help = "Only rows about this device")]
        device: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// Register a device
    Add {
        /// Unique device identifier
        device_id: String,

        /// IPv4 address (dotted quad)
        ip_address: String,

        #[arg(long = "port", default_value_t = crate::models::device::DEFAULT_PORT)]
        port: u16,

        #[arg(
            long = "direction",
            default_value = "auto",
            help = "Punch direction policy: in, out or auto"
        )]
        direction: String,

        #[arg(long = "clear", help = "Clear the device after every fetch")]
        clear: bool,

        #[arg(long = "shift", help = "Linked shift type (repeatable)")]
        shifts: Vec<String>,
    },

    /// List devices
    List,

    /// Remove a device
    Del { device_id: String },

    /// Link a shift type to a device
    Link {
        device_id: String,

        #[arg(long = "shift")]
        shift: String,
    },
}

#[derive(Subcommand)]
pub enum ShiftCommands {
    /// Add a shift type
    Add { name: String },

    /// List shift types with their last sync
    List,
}

#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// Add an employee
    Add {
        code: String,
        name: String,

        #[arg(long = "device-user", help = "User id of the employee on the time clocks")]
        device_user: Option<String>,

        #[arg(long = "inactive")]
        inactive: bool,
    },

    /// List employees
    List,

    /// List stored checkins
    Checkins {
        #[arg(long = "device", value_name = "ID")]
        device: Option<String>,
    },
}
