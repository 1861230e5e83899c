//! Site server with live reload
//!
//! Pages are rendered per request from an in-memory content store, so a
//! content edit only needs the store swapped, not a site rebuild.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Form, Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{TimeZone, Utc};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tower_http::services::ServeDir;

use crate::contact::{ContactGate, ContactSubmission, OutboxSender, SubmitOutcome};
use crate::content::{filter_posts, ContentLoader, Post, Project, SortOrder};
use crate::templates::{tag_views, Notice, PostView, TemplateRenderer};
use crate::theme::ThemeCycler;
use crate::Folio;

/// Live reload script injected into rendered pages in watch mode
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
})();
</script>
</body>
"#;

/// Number of posts shown in the home page "latest writing" section
const RECENT_POSTS: usize = 3;

/// Loaded site content, swapped wholesale on reload
pub struct SiteContent {
    pub posts: Vec<Post>,
    pub projects: Vec<Project>,
}

impl SiteContent {
    /// Load posts and projects through the content loader
    pub fn load(folio: &Folio) -> Result<Self> {
        let loader = ContentLoader::new(folio);
        Ok(Self {
            posts: loader.load_posts()?,
            projects: loader.load_projects()?,
        })
    }
}

/// Shared server state
pub struct AppState {
    folio: Folio,
    content: RwLock<SiteContent>,
    renderer: TemplateRenderer,
    theme: Mutex<ThemeCycler>,
    contact: ContactGate<OutboxSender>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the site server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let content = SiteContent::load(folio)?;
    tracing::info!(
        "Loaded {} posts and {} projects",
        content.posts.len(),
        content.projects.len()
    );

    let theme = ThemeCycler::new(folio.config.palette.clone())?;
    let outbox = folio.base_dir.join(&folio.config.contact.outbox_dir);
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(AppState {
        folio: folio.clone(),
        content: RwLock::new(content),
        renderer: TemplateRenderer::new()?,
        theme: Mutex::new(theme),
        contact: ContactGate::new(OutboxSender::new(outbox)),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route("/", get(home))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .route("/contact", get(contact_form).post(contact_submit))
        .route("/theme/cycle", post(theme_cycle))
        .route("/__livereload", get(livereload_handler))
        .fallback_service(ServeDir::new(&folio.static_dir))
        .with_state(state.clone());

    if watch {
        let folio = folio.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(folio, state).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching content for changes...");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the content directory and swap the store on changes
async fn watch_and_reload(folio: Folio, state: Arc<AppState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.content_dir);
    }
    if folio.static_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.static_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.static_dir);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path = e.path.to_string_lossy();
                    !path.contains(".git") && !path.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                match SiteContent::load(&folio) {
                    Ok(content) => {
                        let posts = content.posts.len();
                        *state.content.write().await = content;
                        tracing::info!("Content reloaded ({} posts)", posts);
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Content reload failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Base template context shared by every page
fn base_context(state: &AppState) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("site", &state.folio.config);
    context.insert("profile", &state.folio.config.profile);

    let accent = state
        .theme
        .lock()
        .map(|t| t.current().to_string())
        .unwrap_or_default();
    context.insert("accent", &accent);

    context
}

/// Render a page, injecting the live reload hook in watch mode
fn render_page(state: &AppState, template: &str, context: &tera::Context) -> Response {
    match state.renderer.render(template, context) {
        Ok(html) if state.live_reload => {
            Html(html.replace("</body>", LIVE_RELOAD_SCRIPT)).into_response()
        }
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error in {}: {}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// GET / - profile, projects, latest posts
async fn home(State(state): State<Arc<AppState>>) -> Response {
    let content = state.content.read().await;

    let recent: Vec<PostView> = filter_posts(&content.posts, None, SortOrder::Newest)
        .iter()
        .take(RECENT_POSTS)
        .map(PostView::from)
        .collect();

    let mut context = base_context(&state);
    context.insert("projects", &content.projects);
    context.insert("recent_posts", &recent);
    render_page(&state, "index.html", &context)
}

#[derive(Debug, Deserialize)]
struct BlogQuery {
    tag: Option<String>,
    order: Option<SortOrder>,
    page: Option<usize>,
}

/// GET /blog?tag=&order=&page= - filtered, ordered post listing
async fn blog_index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogQuery>,
) -> Response {
    let content = state.content.read().await;

    let tag = query.tag.as_deref().filter(|t| !t.is_empty());
    let order = query.order.unwrap_or_default();
    let selected = filter_posts(&content.posts, tag, order);

    let per_page = state.folio.config.per_page.max(1);
    let total_pages = selected.len().div_ceil(per_page).max(1);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);

    let views: Vec<PostView> = selected
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(PostView::from)
        .collect();

    let order_base = match tag {
        Some(tag) => format!(
            "/blog?tag={}&",
            percent_encoding::utf8_percent_encode(tag, percent_encoding::NON_ALPHANUMERIC)
        ),
        None => "/blog?".to_string(),
    };

    let mut context = base_context(&state);
    context.insert("posts", &views);
    context.insert("tags", &tag_views(&content.posts));
    context.insert("selected_tag", &tag);
    context.insert("order", order.as_str());
    context.insert("order_base", &order_base);
    context.insert("page", &page);
    context.insert("total_pages", &total_pages);
    render_page(&state, "blog.html", &context)
}

/// GET /blog/:slug - a single post
async fn blog_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let content = state.content.read().await;

    let Some(post) = content.posts.iter().find(|p| p.slug == slug) else {
        return (StatusCode::NOT_FOUND, "Post not found").into_response();
    };

    let mut context = base_context(&state);
    context.insert("post", &PostView::from(post));
    render_page(&state, "post.html", &context)
}

/// Contact form fields as posted by the browser
#[derive(Debug, Deserialize)]
struct ContactFormData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    message: String,
    /// Honeypot: real users leave this hidden field empty
    #[serde(default)]
    website: String,
    /// Millisecond timestamp issued when the form was rendered
    #[serde(default)]
    started_at: i64,
}

fn contact_context(
    state: &AppState,
    form: &ContactFormData,
    notice: Option<Notice>,
) -> tera::Context {
    let mut context = base_context(state);
    context.insert(
        "form",
        &serde_json::json!({
            "name": form.name,
            "email": form.email,
            "message": form.message,
        }),
    );
    context.insert("started_at", &Utc::now().timestamp_millis());
    context.insert("notice", &notice);
    context
}

fn empty_form() -> ContactFormData {
    ContactFormData {
        name: String::new(),
        email: String::new(),
        message: String::new(),
        website: String::new(),
        started_at: 0,
    }
}

/// GET /contact - fresh form with a new start timestamp
async fn contact_form(State(state): State<Arc<AppState>>) -> Response {
    let context = contact_context(&state, &empty_form(), None);
    render_page(&state, "contact.html", &context)
}

/// POST /contact - run the submission through the gate
async fn contact_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ContactFormData>,
) -> Response {
    let started_at = Utc
        .timestamp_millis_opt(form.started_at)
        .single()
        .unwrap_or_else(Utc::now);

    let submission = ContactSubmission {
        name: form.name.clone(),
        email: form.email.clone(),
        message: form.message.clone(),
        honeypot: form.website.clone(),
        started_at,
    };

    let outcome = state.contact.submit(&submission, Utc::now()).await;

    let context = match outcome {
        // Dropped submissions get the same response as sent ones so a bot
        // cannot tell it was caught. Fields are cleared and a fresh start
        // timestamp is issued either way.
        SubmitOutcome::Sent | SubmitOutcome::Ignored => contact_context(
            &state,
            &empty_form(),
            Some(Notice::success("Thanks! Your message is on its way.")),
        ),
        SubmitOutcome::TooFast => contact_context(
            &state,
            &form,
            Some(Notice::warn(
                "That was quick. Please take a moment and send again.",
            )),
        ),
        SubmitOutcome::Failed(reason) => {
            tracing::warn!("Contact delivery failed: {}", reason);
            contact_context(
                &state,
                &form,
                Some(Notice::error(
                    "Sending failed. Your message is still below, please try again.",
                )),
            )
        }
    };

    render_page(&state, "contact.html", &context)
}

/// POST /theme/cycle - advance the accent palette, return the new color
async fn theme_cycle(State(state): State<Arc<AppState>>) -> Response {
    let Ok(mut theme) = state.theme.lock() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
    };
    theme.cycle();
    Json(serde_json::json!({
        "index": theme.index(),
        "color": theme.current(),
    }))
    .into_response()
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Push a reload message to the client whenever content changes
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }
}
