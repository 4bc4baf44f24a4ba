use crate::app::services::Services;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::core::chat::{ChatMessage, TurnEvent};
use crate::core::lookups::decode_polyline;
use anyhow::{Result, bail};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Gateway { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting aviation-ai gateway on {host} (random port)");
            } else {
                info!("Starting aviation-ai gateway on {host}:{port}");
            }
            crate::transport::gateway::run_gateway(&host, port, Arc::clone(&config)).await
        }

        Commands::Metar { query, chat_prompt } => {
            let services = Services::from_config(&config)?;
            match services.weather.observe(&query).await? {
                Some(observation) => {
                    print!("{observation}");
                    if !observation.as_str().ends_with('\n') {
                        println!();
                    }
                    if chat_prompt {
                        println!("{}", observation.as_chat_prompt());
                    }
                    Ok(())
                }
                None => bail!("No METAR found for “{}”", query.trim()),
            }
        }

        Commands::Route { from, to, decode } => {
            let services = Services::from_config(&config)?;
            let Some(plan) = services.routes.find(&from, &to).await? else {
                bail!("No flight plans found from {} to {}", from.trim(), to.trim());
            };
            if decode {
                for [lat, lon] in decode_polyline(&plan.encoded_polyline)? {
                    println!("{lat:.5},{lon:.5}");
                }
            } else {
                println!("{}", plan.encoded_polyline);
            }
            Ok(())
        }

        Commands::Ask { question } => {
            let services = Services::from_config(&config)?;
            let mut turn = services
                .chat
                .start_turn(vec![ChatMessage::user(question)])
                .await?;
            info!(turn_id = %turn.turn_id, branch = %turn.branch, "Answering");

            let mut stdout = std::io::stdout();
            while let Some(event) = turn.events.recv().await {
                match event {
                    TurnEvent::Fragment(text) => {
                        stdout.write_all(text.as_bytes())?;
                        stdout.flush()?;
                    }
                    TurnEvent::Done => {
                        println!();
                        return Ok(());
                    }
                    TurnEvent::Error(message) => {
                        println!();
                        bail!("answer interrupted: {message}");
                    }
                }
            }
            bail!("answer stream closed before completion")
        }
    }
}
