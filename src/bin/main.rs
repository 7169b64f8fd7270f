use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use hero_particles::{Canvas, Host, MountedField, SceneConfig, SharedCanvas, Surface, Tint, Vec2, Viewport, mount};
use tracing_subscriber::EnvFilter;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(28, 44, 36);

#[derive(Parser)]
#[command(name = "hero-particles", about = "Animated particle background for the practice hero banner")]
struct Cli {
    /// Scene configuration (TOML). Built-in layers are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the seed from the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Render this many frames without a window and log what was drawn.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

struct Layer {
    canvas: SharedCanvas,
    field: MountedField,
}

fn mount_layers(host: &Host, scene: &SceneConfig, base_seed: u64) -> Vec<Layer> {
    scene
        .layers
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            let canvas = Canvas::shared();
            let field = mount(
                host,
                preset.clone(),
                Some(canvas.clone()),
                scene.layer_seed(base_seed, index),
            );
            Layer { canvas, field }
        })
        .collect()
}

/// Presents a canvas through an egui painter, offset to the panel origin.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl PainterSurface<'_> {
    fn point(&self, v: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(v.x, v.y)
    }
}

fn color(tint: Tint) -> egui::Color32 {
    let [r, g, b] = tint.rgb;
    egui::Color32::from_rgba_unmultiplied(r, g, b, (tint.alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl Surface for PainterSurface<'_> {
    // egui repaints the whole panel every frame.
    fn clear(&mut self, _size: Vec2) {}

    fn fill_disc(&mut self, center: Vec2, radius: f32, tint: Tint) {
        self.painter.circle_filled(self.point(center), radius, color(tint));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, tint: Tint) {
        self.painter
            .line_segment([self.point(from), self.point(to)], egui::Stroke::new(width, color(tint)));
    }
}

struct HeroBanner {
    host: Host,
    layers: Vec<Layer>,
    pointer: Option<Vec2>,
}

impl HeroBanner {
    fn new(scene: &SceneConfig, base_seed: u64, viewport: Viewport) -> Self {
        let host = Host::new(viewport);
        let layers = mount_layers(&host, scene, base_seed);
        Self {
            host,
            layers,
            pointer: None,
        }
    }

    fn sync_viewport(&self, rect: egui::Rect) {
        let viewport = self.host.viewport();
        if viewport.width != rect.width() || viewport.container_height != rect.height() {
            self.host.resize(rect.width(), rect.height());
        }
    }

    fn sync_pointer(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let pointer = ctx
            .input(|i| i.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos))
            .map(|pos| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y));

        if pointer == self.pointer {
            return;
        }
        match pointer {
            Some(position) => self.host.pointer_moved(position),
            None => self.host.pointer_left(),
        }
        self.pointer = pointer;
    }
}

impl eframe::App for HeroBanner {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

                self.sync_viewport(rect);
                self.sync_pointer(ctx, rect);
                self.host.tick();

                let painter = ui.painter_at(rect);
                let mut surface = PainterSurface {
                    painter: &painter,
                    origin: rect.min,
                };
                for layer in &self.layers {
                    layer.canvas.lock().replay(&mut surface);
                }
            });

        ctx.request_repaint();
    }
}

fn run_headless(scene: &SceneConfig, base_seed: u64, viewport: Viewport, frames: u32) {
    let host = Host::new(viewport);
    let layers = mount_layers(&host, scene, base_seed);

    for _ in 0..frames {
        host.tick();
    }

    for layer in layers {
        let canvas = layer.canvas.lock();
        tracing::info!(
            field = layer.field.name(),
            particles = layer.field.particle_count(),
            frames = canvas.frames(),
            discs = canvas.disc_count(),
            lines = canvas.line_count(),
            "headless run finished"
        );
    }
}

fn init_tracing(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(fallback))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut scene = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config from {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if cli.seed.is_some() {
        scene.seed = cli.seed;
    }
    init_tracing(scene.log_filter.as_deref().unwrap_or("info"));
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), layers = scene.layers.len(), "loaded scene config");
    }

    let base_seed = scene.seed.unwrap_or_else(rand::random);
    let viewport = Viewport {
        width: cli.width,
        container_height: cli.height,
    };
    tracing::info!(layers = scene.layers.len(), seed = base_seed, "starting hero particles");

    if let Some(frames) = cli.headless {
        run_headless(&scene, base_seed, viewport, frames);
        return Ok(());
    }

    eframe::run_native(
        "Hero Particles",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(cli.width, cli.height)),
            vsync: true,
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(HeroBanner::new(&scene, base_seed, viewport))),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}
