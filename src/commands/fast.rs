use clap::{Args, Subcommand};
use std::io::Write;

use super::{print_json, print_outcome, print_sync, DateFilter, OutputFormat};
use crate::session::Session;
use fitquest_core::stats::fasting_goal_percent;
use fitquest_core::{FastDuration, FastingTicker};

#[derive(Args)]
pub struct FastCommand {
    #[command(subcommand)]
    pub command: FastSubcommand,
}

#[derive(Subcommand)]
pub enum FastSubcommand {
    /// Start a fast now
    Start,

    /// Stop the running fast and log it
    Stop,

    /// Show the running fast
    Status {
        /// Keep updating every second until Ctrl-C
        #[arg(long, short)]
        watch: bool,
    },

    /// List completed fasts (last 7 days by default)
    History {
        #[command(flatten)]
        range: DateFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn progress_line(elapsed: FastDuration, goal_hours: u32) -> String {
    format!(
        "{} elapsed ({:.0}% of {}h goal)",
        elapsed,
        fasting_goal_percent(elapsed.total_seconds(), goal_hours),
        goal_hours
    )
}

impl FastCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FastSubcommand::Start => {
                let sync = session.start_fast().await?;
                println!(
                    "Fast started. Goal: {}h.",
                    session.profile().fasting_plan_hours
                );
                print_sync(&sync);
                Ok(())
            }

            FastSubcommand::Stop => match session.stop_fast().await {
                Some((log, outcome)) => {
                    println!("Fast complete: {}", log.duration);
                    println!("  {}", log);
                    print_outcome(&outcome, session.profile().progression.level);
                    Ok(())
                }
                None => {
                    println!("No fast is running.");
                    Ok(())
                }
            },

            FastSubcommand::Status { watch } => {
                let Some(start) = session.fasting().start_time() else {
                    println!("Not fasting.");
                    return Ok(());
                };
                let goal = session.profile().fasting_plan_hours;
                println!("Fasting since {}", start.format("%Y-%m-%d %H:%M UTC"));

                if !watch {
                    if let Some(elapsed) = session.fasting().elapsed(session.now()) {
                        println!("{}", progress_line(elapsed, goal));
                    }
                    return Ok(());
                }

                let ticker = FastingTicker::start(start, session.clock());
                let mut rx = ticker.subscribe();
                let ctrl_c = tokio::signal::ctrl_c();
                tokio::pin!(ctrl_c);

                let mut stdout = std::io::stdout();
                write!(stdout, "\r{}", progress_line(ticker.latest(), goal))?;
                stdout.flush()?;
                loop {
                    tokio::select! {
                        changed = rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            let elapsed = *rx.borrow_and_update();
                            write!(stdout, "\r{}   ", progress_line(elapsed, goal))?;
                            stdout.flush()?;
                        }
                        _ = &mut ctrl_c => break,
                    }
                }
                println!();
                ticker.stop().await;
                Ok(())
            }

            FastSubcommand::History { range, format } => {
                let (from, to) = range.resolve(session.today(), 7)?;
                let logs = session.store().fasting().filter_by_range(from, to);

                match format {
                    OutputFormat::Json => print_json(&logs)?,
                    OutputFormat::Text => {
                        if logs.is_empty() {
                            println!("No fasts completed for {} to {}", from, to);
                            return Ok(());
                        }
                        let goal_seconds = i64::from(session.profile().fasting_plan_hours) * 3600;
                        for log in &logs {
                            let mark = if log.elapsed_seconds() >= goal_seconds {
                                "*"
                            } else {
                                " "
                            };
                            println!("{} {}", mark, log);
                        }
                        println!("\n* reached the {}h goal", session.profile().fasting_plan_hours);
                    }
                }
                Ok(())
            }
        }
    }
}
