use crate::gateway::SharedBot;
use api::interaction::{self, PublicKey};
use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    server::conn::http1,
    service::service_fn,
    Request, Response,
};
use hyper_util::rt::TokioIo;
use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

async fn respond(req: Request<Incoming>, public: &PublicKey, bot: &SharedBot) -> Response<Full<Bytes>> {
    match interaction::try_respond(req, public, &**bot).await {
        Ok((res, followup)) => {
            if let Some(followup) = followup {
                let bot = bot.clone();
                tokio::spawn(async move { bot.follow_up(followup).await });
            }
            res
        }
        Err(code) => {
            log::warn!("Refused interaction request with status {code}.");
            let mut res = Response::new(Full::new(Bytes::new()));
            *res.status_mut() = code;
            res
        }
    }
}

/// Serves the interaction endpoint until the listener fails.
pub async fn serve(addr: SocketAddr, public: PublicKey, bot: SharedBot) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening for interactions on {addr}.");

    let public = Arc::new(public);
    loop {
        let (stream, peer) = listener.accept().await?;
        let (public, bot) = (public.clone(), bot.clone());
        let service = service_fn(move |req| {
            let (public, bot) = (public.clone(), bot.clone());
            async move { Ok::<_, Infallible>(respond(req, &public, &bot).await) }
        });

        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                log::error!("Connection with {peer} failed: {err}");
            }
        });
    }
}
