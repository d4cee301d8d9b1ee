use crate::api::ApiServer;
use crate::cli::lists::format_list;
use crate::cli::PresentCliArgs;
use crate::config::Config;
use crate::db;
use crate::engine::{LineEngine, LineSource};
use crate::lists;
use crate::session::{
    EnginePhase, PresentationSession, SessionCommand, SessionOptions, SessionStatusHandle,
};
use crate::store::{KeywordStore, MemoryKeywordStore, SqliteKeywordStore};
use crate::{global, matcher};
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Run one presentation from the command line until the transcript ends
/// or the user presses Ctrl-C.
pub async fn run_presentation(args: PresentCliArgs) -> Result<()> {
    let config = Config::load()?;
    info!(
        "Speech engine settings: model={} language={} window={}s slice={}s",
        config.engine.model,
        config.engine.language,
        config.engine.realtime_audio_sec,
        config.engine.realtime_slice_sec
    );

    let list = {
        let conn = db::init_db()?;
        lists::find_list(&conn, &args.list)?
    };
    let list_id = list.id.clone();

    let store: Arc<dyn KeywordStore> = if args.no_save {
        info!("Rehearsal mode, keyword flags will not be saved");
        Arc::new(MemoryKeywordStore::with_list(list))
    } else {
        Arc::new(SqliteKeywordStore::open()?)
    };

    let source = match args.input {
        Some(path) => LineSource::File(path),
        None => LineSource::Stdin,
    };
    let engine =
        LineEngine::new(source).with_line_delay(Duration::from_millis(args.line_delay_ms));

    let mut options = SessionOptions::from(&config);
    if !args.serve {
        // Without the API nothing else could start the engine or end the session
        options.auto_listen = true;
        options.exit_when_idle = true;
    }

    let status = SessionStatusHandle::default();
    let mut session = PresentationSession::load(
        &list_id,
        Box::new(engine),
        store,
        options,
        status.clone(),
    )
    .await?;

    let (tx, rx) = mpsc::channel::<SessionCommand>(16);

    if args.serve {
        let api_server = ApiServer::new(tx.clone(), status.clone(), &config, global::db_file()?);
        tokio::spawn(async move {
            if let Err(e) = api_server.start().await {
                error!("API server failed: {}", e);
            }
        });
        info!(
            "Toggle a keyword with: curl -X POST http://127.0.0.1:{}/toggle/<KEYWORD_ID>",
            config.api.port
        );
    }

    let shutdown_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, ending session");
            let _ = shutdown_tx.send(SessionCommand::Shutdown).await;
        }
    });

    session.start().await?;
    if !args.serve && session.phase() != EnginePhase::Listening {
        let reason = status
            .get()
            .await
            .last_error
            .unwrap_or_else(|| "speech engine did not start".to_string());
        bail!(reason);
    }

    let list = session.run(rx).await?;

    println!();
    print!("{}", format_list(&list));
    println!("Progress: {}%", matcher::progress_percent(&list.keywords));

    Ok(())
}
