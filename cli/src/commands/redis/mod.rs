//! # DruDock Redis Command Group
//!
//! File: cli/src/commands/redis/mod.rs
//!
//! ## Overview
//!
//! `drudock redis info|ping|flush|monitor`: `redis-cli` run inside the app's `redis`
//! service. `monitor` streams every command Redis receives until interrupted, so it
//! is attached to the terminal.
//!
//! ## Examples
//!
//! ```bash
//! drudock redis info
//! drudock --clean-output redis ping
//! ```
//!
use crate::commands::context::Session;
use crate::core::config::Validation;
use crate::core::error::Result;
use clap::{Parser, Subcommand};

const REDIS_SERVICE: &str = "redis";

#[derive(Parser, Debug)]
pub struct RedisArgs {
    #[command(subcommand)]
    command: RedisCommand,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum RedisCommand {
    /// Show the running Redis configuration and statistics.
    Info,
    /// Check that Redis answers.
    Ping,
    /// Remove every key from every database.
    Flush,
    /// Stream every command Redis receives.
    Monitor,
}

impl RedisCommand {
    fn title(self) -> &'static str {
        match self {
            RedisCommand::Info => "Info",
            RedisCommand::Ping => "Ping",
            RedisCommand::Flush => "Flush",
            RedisCommand::Monitor => "Monitor",
        }
    }

    fn cli_args(self) -> [&'static str; 2] {
        let sub = match self {
            RedisCommand::Info => "info",
            RedisCommand::Ping => "ping",
            RedisCommand::Flush => "flushall",
            RedisCommand::Monitor => "monitor",
        };
        ["redis-cli", sub]
    }

    fn tty(self) -> bool {
        self == RedisCommand::Monitor
    }
}

pub async fn handle_redis(args: RedisArgs, session: &Session) -> Result<()> {
    let command = args.command;
    session.section(&format!("REDIS ::: {}", command.title()));
    let ctx = session.app(Validation::Enforce)?;
    ctx.require(&[REDIS_SERVICE]).await?;
    ctx.exec(REDIS_SERVICE, command.cli_args(), command.tty())
        .await?;
    Ok(())
}
