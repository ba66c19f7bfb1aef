use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Extension, Router,
};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{
    config::Config,
    error::{ConfigError, Error},
    invite_manager::InviteManager,
    routes::{
        admin::invite_route,
        base::health_route,
        sign_up::{sign_up_route, verify_invite_route},
    },
    smtp_manager::{LogMailer, Mailer, SmtpManager},
};

pub struct Signals {
    pub stop: Arc<AtomicBool>,
    pub stop_notify: Arc<Notify>,
}

impl Signals {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }

    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

pub fn router(invite_manager: Arc<InviteManager>, allowed_origins: Vec<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(vec![CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health_route))
        .route("/admin/invite", post(invite_route))
        .route("/sign-up/verify", post(verify_invite_route))
        .route("/sign-up", post(sign_up_route))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(invite_manager))
}

async fn serve(listener: TcpListener, app: Router, stop: Arc<AtomicBool>, stop_notify: Arc<Notify>) {
    let notified = stop_notify.notified();
    tokio::pin!(notified);
    notified.as_mut().enable();
    if stop.load(Ordering::SeqCst) {
        return;
    }
    tokio::select! {
        result = async { axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await } => {
            if let Err(err) = result {
                error!("{}", err);
            }
        }
        _ = &mut notified => {
            info!("Invite server stopped");
        },
    }
}

#[derive(Default)]
pub struct Builder {
    //required
    config: Option<Config>,

    //optional
    mailer: Option<Arc<dyn Mailer>>,
    stop: Option<Arc<AtomicBool>>,
    stop_notify: Option<Arc<Notify>>,
}

impl Builder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the mailer chosen from the SMTP configuration.
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn stop_notify(mut self, stop_notify: Arc<Notify>) -> Self {
        self.stop_notify = Some(stop_notify);
        self
    }

    pub async fn start_server(self) -> Result<Arc<InviteServer>, Error> {
        let config: Config = match self.config {
            Some(config) => config,
            None => return Err(ConfigError::MissingProperties("config".to_string()).into()),
        };
        let mailer: Arc<dyn Mailer> = match (self.mailer, config.smtp.as_ref()) {
            (Some(mailer), _) => mailer,
            (None, Some(smtp_config)) => Arc::new(SmtpManager::new(smtp_config)?),
            (None, None) => {
                warn!("No SMTP server configured, invites will only be logged");
                Arc::new(LogMailer)
            }
        };
        let invite_manager: Arc<InviteManager> = Arc::new(InviteManager::new(&config, mailer)?);
        let signals = Signals {
            stop: self.stop.unwrap_or(Arc::new(AtomicBool::new(false))),
            stop_notify: self.stop_notify.unwrap_or(Arc::new(Notify::new())),
        };

        let listener = TcpListener::bind(config.bind_address).await?;
        let local_addr = listener.local_addr()?;
        info!("REST endpoint listening on {}", local_addr);

        let app = router(
            invite_manager.to_owned(),
            config.get_allowed_origins().to_owned(),
        );
        let _ = tokio::spawn(serve(
            listener,
            app,
            signals.stop.to_owned(),
            signals.stop_notify.to_owned(),
        ));

        Ok(Arc::new(InviteServer {
            invite_manager,
            signals,
            local_addr,
        }))
    }
}

pub struct InviteServer {
    pub invite_manager: Arc<InviteManager>,
    pub signals: Signals,
    pub local_addr: SocketAddr,
}

impl InviteServer {
    pub fn builder() -> Builder {
        Builder::default()
    }
}
