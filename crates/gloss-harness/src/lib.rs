#![forbid(unsafe_code)]

//! Headless scenario runner for Gloss.
//!
//! Mounts a short passage of annotated words into a [`Host`], drives it with
//! a scripted sequence of clicks, key presses and outside taps, and captures
//! a markup [`Snapshot`] after every step.
//!
//! # Environment
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `GLOSS_VIEWPORT_WIDTH` | `1024` | Viewport width |
//! | `GLOSS_VIEWPORT_HEIGHT` | `768` | Viewport height |
//! | `GLOSS_CELL_WIDTH` | `8` | Width of one text column |
//! | `GLOSS_LOG` | `info` | `EnvFilter` directives |
//! | `GLOSS_LOG_JSON` | off | `1`/`true` for JSON log lines |

use std::fmt;

use gloss::{
    Annotation, DocumentError, Event, Host, HostConfig, Interactive, KeyCode, NodeId,
    PointerEvent, Rect, RevealBlock, Tag,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const ENV_VIEWPORT_WIDTH: &str = "GLOSS_VIEWPORT_WIDTH";
pub const ENV_VIEWPORT_HEIGHT: &str = "GLOSS_VIEWPORT_HEIGHT";
pub const ENV_CELL_WIDTH: &str = "GLOSS_CELL_WIDTH";
pub const ENV_LOG: &str = "GLOSS_LOG";
pub const ENV_LOG_JSON: &str = "GLOSS_LOG_JSON";

// ============================================================================
// Errors
// ============================================================================

/// Harness error type.
#[derive(Debug)]
pub enum HarnessError {
    /// An environment variable held an unusable value.
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// A scripted document edit failed.
    Document(DocumentError),
    /// The global tracing subscriber could not be installed.
    Subscriber(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { var, value } => {
                write!(f, "invalid value for {var}: {value:?}")
            }
            Self::Document(err) => write!(f, "document: {err}"),
            Self::Subscriber(msg) => write!(f, "tracing subscriber: {msg}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<DocumentError> for HarnessError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Harness configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub cell_width: f64,
    /// `EnvFilter` directives.
    pub log_filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let host = HostConfig::default();
        Self {
            viewport_width: host.viewport_width,
            viewport_height: host.viewport_height,
            cell_width: host.cell_width,
            log_filter: "info".to_owned(),
            log_json: false,
        }
    }
}

impl HarnessConfig {
    #[must_use]
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    #[must_use]
    pub fn cell_width(mut self, width: f64) -> Self {
        self.cell_width = width;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(width) = parse_positive(&lookup, ENV_VIEWPORT_WIDTH)? {
            config.viewport_width = width;
        }
        if let Some(height) = parse_positive(&lookup, ENV_VIEWPORT_HEIGHT)? {
            config.viewport_height = height;
        }
        if let Some(cell) = parse_positive(&lookup, ENV_CELL_WIDTH)? {
            config.cell_width = cell;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            config.log_json = match json.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "" | "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(HarnessError::InvalidEnv {
                        var: ENV_LOG_JSON,
                        value: json,
                    });
                }
            };
        }
        Ok(config)
    }

    /// Host configuration for this harness run.
    #[must_use]
    pub fn host_config(&self) -> HostConfig {
        HostConfig::default()
            .viewport(self.viewport_width, self.viewport_height)
            .cell_width(self.cell_width)
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str) -> Result<Option<f64>, HarnessError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        _ => Err(HarnessError::InvalidEnv { var, value: raw }),
    }
}

/// Install the global tracing subscriber described by `config`.
pub fn init_tracing(config: &HarnessConfig) -> Result<(), HarnessError> {
    let filter = EnvFilter::try_new(&config.log_filter).map_err(|_| HarnessError::InvalidEnv {
        var: ENV_LOG,
        value: config.log_filter.clone(),
    })?;
    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|err| HarnessError::Subscriber(err.to_string()))
}

// ============================================================================
// Scripted session
// ============================================================================

/// Markup of the passage after one scripted step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub label: String,
    pub markup: String,
    /// Placement offsets of the annotated words, in mount order.
    pub offsets: Vec<Option<f64>>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.label)?;
        writeln!(f, "{}", self.markup)?;
        let offsets: Vec<String> = self
            .offsets
            .iter()
            .map(|o| o.map_or_else(|| "-".to_owned(), |o| format!("{o}px")))
            .collect();
        write!(f, "offsets: [{}]", offsets.join(", "))
    }
}

/// Width reserved at the right edge for the word that exercises clamping.
const EDGE_WORD_INSET: f64 = 40.0;

struct Passage {
    paragraph: NodeId,
    lead: NodeId,
    words: Vec<Annotation>,
    block: RevealBlock,
}

impl Passage {
    fn mount(host: &mut Host) -> Result<Self, HarnessError> {
        let root = host.document().root();
        let doc = host.document_mut();
        let paragraph = doc.create_element(Tag::P);
        doc.append_child(root, paragraph)?;
        let lead = doc.create_element(Tag::Span);
        doc.set_text(lead, "Dalam kalimat ")?;
        doc.append_child(paragraph, lead)?;

        let mut words = vec![
            Annotation::arabic("كتاب", Some("buku")),
            Annotation::indonesian("rumah", Some("بيت")),
            Annotation::arabic("و", None),
            Annotation::arabic("المسجد", Some("masjid, tempat sujud")),
        ];
        for word in &mut words {
            word.mount(host, paragraph)?;
        }

        // Pin the last word against the right edge so its tooltip must clamp.
        if let Some(edge) = words.last().and_then(Annotation::root) {
            let viewport = host.viewport();
            let width = host.config().cell_width * 6.0;
            host.document_mut().set_rect(
                edge,
                Rect::new(viewport.width - EDGE_WORD_INSET, 0.0, width, 20.0),
            )?;
        }

        let mut block = RevealBlock::new(
            "الكلام هو اللفظ المركب المفيد بالوضع",
            "Kalam adalah lafaz yang tersusun dan berfaedah menurut kesengajaan.",
        )
        .source("Alfiyah Ibnu Malik, Bab Kalam");
        let root = host.document().root();
        block.mount(host.document_mut(), root)?;

        host.commit();
        Ok(Self {
            paragraph,
            lead,
            words,
            block,
        })
    }

    /// Queue `event` and let the host deliver and commit it.
    fn step(&mut self, host: &mut Host, event: Event) -> usize {
        host.push_event(event);
        let mut targets: Vec<&mut dyn Interactive> = self
            .words
            .iter_mut()
            .map(|w| w as &mut dyn Interactive)
            .collect();
        targets.push(&mut self.block);
        host.pump(&mut targets)
    }

    fn anchor(&self, index: usize) -> Option<NodeId> {
        self.words.get(index).and_then(Annotation::anchor)
    }

    fn snapshot(&self, host: &Host, label: &str) -> Snapshot {
        let root = host.document().root();
        Snapshot {
            label: label.to_owned(),
            markup: host.document().to_markup(root),
            offsets: self
                .words
                .iter()
                .filter(|w| w.is_interactive())
                .map(Annotation::offset)
                .collect(),
        }
    }
}

/// Run the scripted session and return one snapshot per step.
pub fn run_demo(config: &HarnessConfig) -> Result<Vec<Snapshot>, HarnessError> {
    let mut host = Host::new(config.host_config());
    let mut passage = Passage::mount(&mut host)?;
    let mut snapshots = vec![passage.snapshot(&host, "mounted")];

    let steps: Vec<(&str, Option<Event>)> = vec![
        ("click كتاب", passage.anchor(0).map(Event::click)),
        (
            "tap outside",
            Some(Event::Pointer(PointerEvent::touch_start(passage.lead))),
        ),
        (
            "space on rumah",
            passage.anchor(1).map(|a| Event::key(a, KeyCode::Char(' '))),
        ),
        ("click المسجد near the right edge", passage.anchor(3).map(Event::click)),
        ("reveal translation", passage.block.content().map(Event::click)),
    ];

    for (label, event) in steps {
        let Some(event) = event else {
            tracing::warn!(step = label, "step skipped: target not mounted");
            continue;
        };
        let delivered = passage.step(&mut host, event);
        tracing::info!(step = label, delivered, "step finished");
        snapshots.push(passage.snapshot(&host, label));
    }

    for word in &mut passage.words {
        word.unmount(&mut host)?;
    }
    passage.block.unmount(host.document_mut())?;
    tracing::info!(
        listeners = host.bus().listener_count(),
        pending_frames = host.frames().pending_count(),
        paragraph_children = host.document().children(passage.paragraph).len(),
        "session torn down"
    );
    snapshots.push(passage.snapshot(&host, "unmounted"));
    Ok(snapshots)
}
