use std::collections::VecDeque;
use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use windgauge::config::GaugeConfig;
use windgauge::gauge::{CircularGauge, Color, DrawCommand, LabelSize, Point, Size};
use windgauge::sensor::{ReadingSlot, ReplaySource, SensorFeed, WindSource};
use windgauge::session::{MeasurementState, MeasurementSummary};
use windgauge::units::{DirectionUnit, SpeedUnit};
use windgauge::{FrameSnapshot, MeasurementProcessor};

#[cfg(feature = "simulation")]
use windgauge::simulation::{SyntheticWind, SyntheticWindConfig};

#[derive(Parser, Debug)]
#[command(name = "windgauge_gui")]
#[command(about = "Live wind measurement - GUI", long_about = None)]
struct Args {
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    #[cfg(feature = "simulation")]
    #[arg(long, conflicts_with = "input")]
    simulate: bool,

    #[cfg(feature = "simulation")]
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "0.05")]
    interval: f32,

    #[arg(long)]
    lock_north: bool,

    #[arg(long)]
    no_stop: bool,

    #[arg(short = 'u', long, value_enum)]
    speed_unit: Option<SpeedUnit>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct GuiLogger {
    tx: Sender<String>,
    max_level: log::LevelFilter,
}

impl log::Log for GuiLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("[{}] {}", record.level(), record.args());
            let _ = self.tx.send(msg);
        }
    }

    fn flush(&self) {}
}

const MAX_HISTORY_SECS: f64 = 120.0;
const MAX_LOG_LINES: usize = 1000;
const GAUGE_SIZE: f32 = 320.0;
const GAUGE_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(20, 20, 30);
const SMOOTHED_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 200, 255);

struct SpeedHistory {
    smoothed: VecDeque<[f64; 2]>,
    raw: VecDeque<[f64; 2]>,
}

impl SpeedHistory {
    fn new() -> Self {
        Self {
            smoothed: VecDeque::new(),
            raw: VecDeque::new(),
        }
    }

    fn push(&mut self, snapshot: &FrameSnapshot, unit: SpeedUnit) {
        let t = snapshot.time_secs as f64;
        self.smoothed
            .push_back([t, unit.convert(snapshot.reading.speed) as f64]);
        self.raw.push_back([t, unit.convert(snapshot.raw.speed) as f64]);

        let cutoff = t - MAX_HISTORY_SECS;
        for buf in [&mut self.smoothed, &mut self.raw] {
            while buf.front().is_some_and(|p| p[0] < cutoff) {
                buf.pop_front();
            }
        }
    }
}

struct WindGaugeApp {
    config: GaugeConfig,
    log_rx: Receiver<String>,
    log_lines: VecDeque<String>,
    slot: ReadingSlot,
    feed: Option<SensorFeed>,
    processor: MeasurementProcessor,
    gauge: CircularGauge,
    snapshot: Option<FrameSnapshot>,
    summary: Option<MeasurementSummary>,
    history: SpeedHistory,
    lock_north: bool,
}

impl WindGaugeApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        config: GaugeConfig,
        log_rx: Receiver<String>,
        slot: ReadingSlot,
        feed: SensorFeed,
    ) -> Self {
        let processor = MeasurementProcessor::new(&config);
        let gauge = CircularGauge::new(&config.gauge, Size::new(GAUGE_SIZE, GAUGE_SIZE));
        let lock_north = config.session.lock_north;
        Self {
            config,
            log_rx,
            log_lines: VecDeque::new(),
            slot,
            feed: Some(feed),
            processor,
            gauge,
            snapshot: None,
            summary: None,
            history: SpeedHistory::new(),
            lock_north,
        }
    }

    fn drain_logs(&mut self) {
        while let Ok(msg) = self.log_rx.try_recv() {
            self.log_lines.push_back(msg);
            while self.log_lines.len() > MAX_LOG_LINES {
                self.log_lines.pop_front();
            }
        }
    }

    fn advance(&mut self, delta_secs: f32) {
        if self.summary.is_some() || self.slot.sequence() == 0 {
            return;
        }

        match self.processor.tick_from_slot(&self.slot, delta_secs) {
            Ok(snapshot) => {
                self.history.push(&snapshot, self.config.gauge.speed_unit);
                self.snapshot = Some(snapshot);
                if let MeasurementState::Cancellable { seconds_left } = snapshot.state {
                    if seconds_left <= 0.0 {
                        self.finish();
                    }
                }
            }
            Err(e) => log::warn!("Skipping frame: {}", e),
        }

        if self.summary.is_none() && self.feed.as_ref().is_some_and(|f| f.is_exhausted()) {
            log::info!("Sensor input ended");
            self.finish();
        }
    }

    fn finish(&mut self) {
        let processor =
            std::mem::replace(&mut self.processor, MeasurementProcessor::new(&self.config));
        self.summary = Some(processor.finish());
        if let Some(feed) = self.feed.take() {
            feed.stop();
        }
    }

    fn draw_gauge(&mut self, ui: &mut egui::Ui) {
        let desired = egui::vec2(GAUGE_SIZE, GAUGE_SIZE);
        let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 4.0, GAUGE_BACKGROUND);

        if self.summary.is_some() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Done",
                egui::FontId::proportional(18.0),
                egui::Color32::LIGHT_GRAY,
            );
            return;
        }

        self.gauge.resize(Size::new(rect.width(), rect.height()));
        let to_pos = |p: Point| rect.min + egui::vec2(p.x, p.y);

        for command in self.processor.render(&self.gauge) {
            match command {
                DrawCommand::Disc {
                    center,
                    radius,
                    color,
                } => {
                    painter.circle_filled(to_pos(center), radius, to_color32(color));
                }
                DrawCommand::Label {
                    text,
                    position,
                    color,
                    size,
                } => {
                    let font_size = match size {
                        LabelSize::Large => 16.0,
                        LabelSize::Small => 11.0,
                    };
                    painter.text(
                        to_pos(position),
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::proportional(font_size),
                        to_color32(color),
                    );
                }
            }
        }
    }

    fn draw_readout(&mut self, ui: &mut egui::Ui) {
        let unit = self.config.gauge.speed_unit;
        let dash = egui::RichText::new("---").color(egui::Color32::DARK_GRAY);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Wind:").color(egui::Color32::LIGHT_GRAY));
            if let Some(s) = &self.snapshot {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {} from {}",
                        unit.format(s.reading.speed),
                        unit,
                        DirectionUnit::Cardinal.format(s.reading.wind_direction)
                    ))
                    .color(egui::Color32::WHITE)
                    .strong(),
                );
            } else {
                ui.label(dash.clone());
            }
        });
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Heading:").color(egui::Color32::LIGHT_GRAY));
            if let Some(s) = &self.snapshot {
                ui.label(
                    egui::RichText::new(DirectionUnit::Degrees.format(s.reading.heading))
                        .color(egui::Color32::WHITE),
                );
            } else {
                ui.label(dash);
            }
        });

        ui.add_space(8.0);
        if ui.checkbox(&mut self.lock_north, "Lock north").changed() {
            self.processor.set_lock_north(self.lock_north);
        }

        if let Some(summary) = &self.summary {
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new(format!(
                    "Mean {} {unit}, max {} {unit} over {:.1} s",
                    unit.format(summary.mean_speed),
                    unit.format(summary.max_speed),
                    summary.duration_secs,
                    unit = unit
                ))
                .color(egui::Color32::WHITE),
            );
            if let Some(direction) = summary.wind_direction {
                ui.label(
                    egui::RichText::new(format!(
                        "From {} ({:.0}°)",
                        DirectionUnit::Cardinal.format(direction),
                        direction
                    ))
                    .color(egui::Color32::WHITE),
                );
            }
            if !summary.valid {
                ui.label(
                    egui::RichText::new("Too short to be valid")
                        .color(egui::Color32::from_rgb(255, 100, 100)),
                );
            }
        }
    }

    fn draw_plot(&self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new(format!("Wind speed ({})", self.config.gauge.speed_unit))
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        let smoothed: PlotPoints = self.history.smoothed.iter().copied().collect();
        let raw: PlotPoints = self.history.raw.iter().copied().collect();
        Plot::new("speed_plot")
            .height(200.0)
            .include_y(0.0)
            .x_axis_label("s")
            .y_axis_min_width(60.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new("Smoothed", smoothed).color(SMOOTHED_COLOR));
                plot_ui.line(
                    Line::new("Raw", raw)
                        .color(SMOOTHED_COLOR.gamma_multiply(0.4))
                        .style(egui_plot::LineStyle::Dashed { length: 4.0 }),
                );
            });
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    let [r, g, b, a] = color.to_rgba8();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

impl eframe::App for WindGaugeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_logs();
        let delta = ctx.input(|i| i.stable_dt);
        self.advance(delta);
        ctx.request_repaint();

        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) && self.summary.is_none() {
            self.finish();
        }

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.processor.session().current_state();
                let caption = if self.summary.is_some() {
                    MeasurementState::Finished.to_string()
                } else {
                    state.to_string()
                };
                let button = egui::Button::new(egui::RichText::new(caption).strong());
                if ui
                    .add_enabled(self.summary.is_none(), button)
                    .clicked()
                {
                    self.finish();
                }

                if self.summary.is_none() && !matches!(state, MeasurementState::Stoppable) {
                    ui.add(
                        egui::ProgressBar::new(self.processor.session().progress())
                            .desired_width(160.0),
                    );
                }

                ui.separator();
                let total_secs = self.snapshot.map_or(0.0, |s| s.time_secs);
                let minutes = (total_secs / 60.0) as u64;
                let secs = total_secs % 60.0;
                ui.label(
                    egui::RichText::new(format!("{:02}:{:04.1}", minutes, secs))
                        .color(egui::Color32::WHITE)
                        .strong(),
                );

                if self.slot.sequence() == 0 {
                    ui.separator();
                    ui.label(
                        egui::RichText::new("Waiting for sensor...")
                            .color(egui::Color32::YELLOW),
                    );
                }
            });
        });

        egui::TopBottomPanel::bottom("debug_log")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Debug Log")
                            .color(egui::Color32::LIGHT_GRAY)
                            .strong(),
                    );
                    if ui.small_button("Clear").clicked() {
                        self.log_lines.clear();
                    }
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(
                                egui::RichText::new(line)
                                    .font(egui::FontId::monospace(11.0))
                                    .color(egui::Color32::from_rgb(180, 180, 180)),
                            );
                        }
                    });
            });

        egui::SidePanel::left("gauge_panel")
            .default_width(GAUGE_SIZE + 30.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    self.draw_gauge(ui);
                });
                self.draw_readout(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_plot(ui);
        });
    }
}

fn open_source(args: &Args) -> anyhow::Result<Box<dyn WindSource>> {
    #[cfg(feature = "simulation")]
    {
        if args.simulate {
            let config = SyntheticWindConfig {
                seed: args.seed,
                ..SyntheticWindConfig::default()
            };
            return Ok(Box::new(SyntheticWind::new(config)?));
        }
    }

    match &args.input {
        Some(path) => Ok(Box::new(ReplaySource::open(path, args.interval)?)),
        None => anyhow::bail!("no sensor input given (use --input FILE or --simulate)"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let (tx, rx) = crossbeam_channel::unbounded::<String>();

    let logger = GuiLogger {
        tx,
        max_level: log_level,
    };
    log::set_boxed_logger(Box::new(logger)).ok();
    log::set_max_level(log_level);

    let mut config = match &args.config {
        Some(path) => GaugeConfig::load(path)?,
        None => GaugeConfig::default(),
    };
    if let Some(unit) = args.speed_unit {
        config.gauge.speed_unit = unit;
    }
    if args.lock_north {
        config.session.lock_north = true;
    }
    if args.no_stop {
        config.session.stoppable = false;
    }
    config.validate()?;

    let slot = ReadingSlot::new();
    let feed = SensorFeed::spawn(open_source(&args)?, slot.clone(), true);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([700.0, 450.0])
            .with_title("windgauge"),
        ..Default::default()
    };

    eframe::run_native(
        "windgauge",
        native_options,
        Box::new(move |cc| Ok(Box::new(WindGaugeApp::new(cc, config, rx, slot, feed)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
