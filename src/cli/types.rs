use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sessionlist")]
#[command(about = "Session list server test tools", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log request bodies and server replies to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Make a random announcement and print the server response
    ///
    /// Exit status is nonzero if the server returned an error. The output
    /// can be saved and passed to `update` later.
    Announce {
        /// List server API root
        url: String,

        /// Hostname to announce (empty lets the server use the client address)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to announce
        #[arg(short, long)]
        port: Option<u16>,

        /// Protocol version to announce
        #[arg(long)]
        protocol: Option<String>,

        /// Set the NSFM tag
        #[arg(long)]
        nsfm: bool,

        /// Private listing (room code only)
        #[arg(long)]
        private: bool,
    },

    /// Show the public session list
    List {
        /// List server API root
        url: String,

        /// Include NSFM sessions
        #[arg(long)]
        nsfm: bool,

        /// Filter by protocol (comma separated list accepted)
        #[arg(long)]
        protocol: Option<String>,

        /// Filter by title
        #[arg(long)]
        title: Option<String>,

        /// Print results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Get session details by room code
    Roomcode {
        /// List server API root
        url: String,

        /// Session room code
        code: String,
    },

    /// Update or unlist announcements from response files
    ///
    /// If more than one response file is given, a batch update is made.
    Update {
        /// Announcement response file(s) followed by the list server API root
        #[arg(num_args = 2.., required = true, value_name = "FILE... URL")]
        args: Vec<String>,

        /// Update title
        #[arg(long)]
        title: Option<String>,

        /// Update user count
        #[arg(long)]
        users: Option<u32>,

        /// Update username list (comma separated)
        #[arg(long)]
        usernames: Option<String>,

        /// Update the NSFM tag (true/false)
        #[arg(long)]
        nsfm: Option<String>,

        /// Update the password required tag (true/false)
        #[arg(long)]
        password: Option<String>,

        /// Unlist the sessions instead of updating them
        #[arg(long)]
        unlist: bool,
    },

    /// Announce a random session and keep it listed until Ctrl+C is pressed
    Run {
        /// List server API root
        url: String,

        /// Hostname to announce
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
}
