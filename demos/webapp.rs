//! A small web app showing the tinyweb-rs API: static files, JSON, path
//! captures, bodies and chunked streaming.
//!
//! Run with `RUST_LOG=debug cargo run --example webapp`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use log::info;
use serde::Deserialize;
use serde_json::json;
use tinyweb_rs::{
    HttpServer, Method, Reply, RouteConfig, SendFileOptions, ServerConfig, ServerError, StatusCode,
};

/// Body accepted by `POST /pins/<pin_name>`.
#[derive(Debug, Deserialize)]
struct PinUpdate {
    value: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let config = ServerConfig::new("127.0.0.1:8081".parse()?);
    let mut server = HttpServer::new(config);

    // Pin states, standing in for real GPIO.
    let pins: Arc<Mutex<BTreeMap<String, bool>>> = Arc::new(Mutex::new(
        [("led", false), ("relay", true)]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    ));

    // Serve the index page from disk
    server.add_route(Method::GET, "/", |_req, resp, _args| {
        Box::pin(async move {
            let options = SendFileOptions::default().with_content_type("text/html");
            resp.send_file("demos/index.html", &options).await?;
            Ok(Reply::Done)
        })
    })?;

    // Plain text with a path capture and an optional query parameter
    server.add_route(Method::GET, "/hello/<name>", |req, resp, args| {
        Box::pin(async move {
            let greeting = req.get_query_param("greeting").map_or("Hello", |s| s.as_str());
            resp.add_header("Content-Type", "text/plain")?;
            resp.send(format!("{greeting}, {}!", args[0])).await?;
            Ok(Reply::Done)
        })
    })?;

    // List all pins as JSON
    let state = Arc::clone(&pins);
    server.add_route(Method::GET, "/pins", move |_req, _resp, _args| {
        let reply = match state.lock() {
            Ok(pins) => Reply::json(&*pins),
            Err(_) => Err(ServerError::InternalError("pin state poisoned".into())),
        };
        Box::pin(async move { reply })
    })?;

    // Set a pin from a JSON body
    let state = Arc::clone(&pins);
    server.add_route_with_config(
        Method::POST,
        "/pins/<pin_name>",
        RouteConfig::default().with_body().with_max_body_size(64),
        move |req, _resp, args| {
            let state = Arc::clone(&state);
            Box::pin(async move {
                let update: PinUpdate = req.json()?;
                let mut pins = state
                    .lock()
                    .map_err(|_| ServerError::InternalError("pin state poisoned".into()))?;
                match pins.get_mut(&args[0]) {
                    Some(value) => {
                        *value = update.value;
                        Ok(Reply::json_with_status(
                            &json!({ "pin": args[0], "value": update.value }),
                            StatusCode::ACCEPTED,
                        )?)
                    }
                    None => Err(ServerError::Http(StatusCode::NOT_FOUND)),
                }
            })
        },
    )?;

    // Old location of the pin list
    server.add_route(Method::GET, "/status", |_req, resp, _args| {
        Box::pin(async move {
            resp.redirect("/pins", None).await?;
            Ok(Reply::Done)
        })
    })?;

    // A chunked response built from an iterator
    server.add_route(Method::GET, "/count/<n>", |_req, _resp, args| {
        Box::pin(async move {
            let n: u32 = args[0]
                .parse()
                .map_err(|_| ServerError::Http(StatusCode::BAD_REQUEST))?;
            Ok(Reply::stream((1..=n).map(|i| format!("{i}\n"))))
        })
    })?;

    // Everything else gets a friendly 404
    server.set_catch_all(|req, resp, _args| {
        Box::pin(async move {
            resp.set_status(StatusCode::NOT_FOUND)?;
            resp.start_html().await?;
            resp.send(format!("<h1>Nothing at {}</h1>", req.path)).await?;
            Ok(Reply::Done)
        })
    });

    info!("Starting server, press Ctrl+C to stop");
    server.run().await?;

    Ok(())
}
