//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    BlockCommand, CancelBookingCommand, CheckCommand, ConfirmCommand, HoldCommand, InitCommand,
    ListCommand, ReleaseCommand, SweepCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for managing exclusive time-slot reservations.
#[derive(Parser)]
#[command(name = "slotlock")]
#[command(version, about = "Manage exclusive time-slot reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "SLOTLOCK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "SLOTLOCK_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Create a provisional hold on a slot
    Hold(HoldCommand),

    /// Confirm a hold into a firm booking
    Confirm(ConfirmCommand),

    /// Release a hold
    Release(ReleaseCommand),

    /// Register a maintenance, blackout, or buffer block
    Block(BlockCommand),

    /// Free the blocks of a cancelled booking
    #[command(name = "cancel-booking")]
    CancelBooking(CancelBookingCommand),

    /// Delete expired holds
    Sweep(SweepCommand),

    /// Show a resource's schedule for a day
    List(ListCommand),

    /// Check whether a slot is free
    Check(CheckCommand),
}
