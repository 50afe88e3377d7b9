use anyhow::Result;
use clap::Parser;
use client_core::{BeerMenuClient, FormAction, FormSession};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod view;

use commands::{parse_command, EditorCommand, HELP};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    /// Reset the server to the starter menu before editing.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let client = BeerMenuClient::new(&args.server_url)?;
    if args.seed {
        client.seed().await?;
    }
    let mut session = FormSession::open(client).await?;
    print!("{}", view::render(session.state()));

    let (done_tx, mut done_rx) = mpsc::channel::<FormAction>(4);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line, session.state()) {
                    Ok(EditorCommand::Help) => println!("{HELP}"),
                    Ok(EditorCommand::List) => print!("{}", view::render(session.state())),
                    Ok(EditorCommand::Edit(action)) => {
                        debug!(?action, "applying edit");
                        session.dispatch(action);
                        print!("{}", view::render(session.state()));
                    }
                    Ok(EditorCommand::Save) => match session.start_save() {
                        Some(pending) => {
                            let done_tx = done_tx.clone();
                            tokio::spawn(async move {
                                let _ = done_tx.send(pending.run().await).await;
                            });
                            println!("saving...");
                        }
                        None => println!("a save is already in progress"),
                    },
                    Ok(EditorCommand::Quit) => break,
                    Err(err) => println!("{err}"),
                }
            }
            Some(action) = done_rx.recv() => {
                session.dispatch(action);
                if let Some(notice) = session.state().notice() {
                    println!("* {}", notice.message());
                }
            }
        }
    }

    if session.state().is_saving() {
        println!("waiting for save to finish...");
        if let Some(action) = done_rx.recv().await {
            session.dispatch(action);
            if let Some(notice) = session.state().notice() {
                println!("* {}", notice.message());
            }
        }
    }
    Ok(())
}
