use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use log::info;

mod analysis;
use analysis::PassengerSet;
mod capture;
use capture::{save_all_png, save_png, to_color_image};
mod classes;
mod dataset;
use dataset::{DATA_URL, DataSource, default_cache_dir, load_dataset, resolve_data_file};
mod export;
use export::{ExportLog, show_chart};
mod plotting;
use plotting::{ALL_LAYOUTS, ChartLayout, LaunchControl, RenderedChart, StaticChart, render_chart};
mod report;
use report::{ALL_INTERACTIVE_CHARTS, InteractiveChart};

const WINDOW_TITLE: &str = "Визуализация данных Titanic";
const TOAST_DURATION: Duration = Duration::from_secs(3);

fn default_dataset() -> String {
    "titanic".into()
}

fn default_data_url() -> String {
    DATA_URL.into()
}

fn default_keep_exports() -> bool {
    true
}

fn default_window_width() -> f32 {
    1600.0
}

fn default_window_height() -> f32 {
    1200.0
}

/// Persistent configuration stored as JSON in the user's config directory.
///
/// Every field has a serde default so older or partial files still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(default)]
    layout: ChartLayout,
    #[serde(default = "default_dataset")]
    dataset: String,
    #[serde(default = "default_data_url")]
    data_url: String,
    /// Local CSV used instead of the download. `TITANIC_DATA_FILE` wins over it.
    #[serde(default)]
    data_file: Option<String>,
    /// Leave exported chart documents on disk after exit.
    #[serde(default = "default_keep_exports")]
    keep_exports: bool,
    #[serde(default = "default_window_width")]
    window_width: f32,
    #[serde(default = "default_window_height")]
    window_height: f32,
}

impl Settings {
    const FILE: &'static str = "titanic_viz_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings, falling back to defaults when the file is missing or invalid.
    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring invalid settings in {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(data) = serde_json::to_string_pretty(self) {
                if let Err(e) = std::fs::write(&path, data) {
                    log::warn!("Failed to save settings: {e}");
                }
            }
        }
    }

    fn data_source(&self) -> DataSource {
        DataSource {
            file: resolve_data_file(self.data_file.as_deref()),
            base_url: self.data_url.clone(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            dataset: default_dataset(),
            data_url: default_data_url(),
            data_file: None,
            keep_exports: default_keep_exports(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

/// One static chart in the grid.
struct ChartView {
    chart: StaticChart,
    texture: Option<egui::TextureHandle>,
    rendered: Option<RenderedChart>,
}

struct VizApp {
    passengers: PassengerSet,
    views: Vec<ChartView>,
    selected: Option<InteractiveChart>,
    exports: ExportLog,
    toast: Option<(String, Instant)>,
    settings: Settings,
    settings_dirty: bool,
}

impl VizApp {
    fn new(ctx: &egui::Context, passengers: PassengerSet, settings: Settings) -> Self {
        let mut app = Self {
            passengers,
            views: Vec::new(),
            selected: None,
            exports: ExportLog::default(),
            toast: None,
            settings,
            settings_dirty: false,
        };
        app.render_views(ctx);
        app
    }

    /// Draw every chart of the current layout and upload it as a texture.
    fn render_views(&mut self, ctx: &egui::Context) {
        self.views = self
            .settings
            .layout
            .charts()
            .iter()
            .map(|&chart| match render_chart(chart, &self.passengers) {
                Ok(rendered) => {
                    let texture = ctx.load_texture(
                        chart.file_stem(),
                        to_color_image(&rendered),
                        egui::TextureOptions::default(),
                    );
                    ChartView {
                        chart,
                        texture: Some(texture),
                        rendered: Some(rendered),
                    }
                }
                Err(e) => {
                    log::error!("Failed to render {}: {e}", chart.file_stem());
                    ChartView {
                        chart,
                        texture: None,
                        rendered: None,
                    }
                }
            })
            .collect();
        info!(
            "Rendered {} charts for layout {:?}",
            self.views.len(),
            self.settings.layout
        );
    }

    fn set_layout(&mut self, ctx: &egui::Context, layout: ChartLayout) {
        if self.settings.layout == layout {
            return;
        }
        self.settings.layout = layout;
        self.settings_dirty = true;
        self.render_views(ctx);
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some((message.into(), Instant::now()));
    }

    fn launch(&mut self, chart: InteractiveChart) {
        if let Err(e) = show_chart(chart, &self.passengers, &mut self.exports) {
            log::error!("Failed to show {}: {e}", chart.key());
            self.notify(format!("Не удалось открыть график: {e}"));
        }
    }

    fn rendered_views(&self) -> Vec<(StaticChart, &RenderedChart)> {
        self.views
            .iter()
            .filter_map(|v| v.rendered.as_ref().map(|r| (v.chart, r)))
            .collect()
    }

    fn save_all(&mut self) {
        let Some(dir) = FileDialog::new().pick_folder() else {
            return;
        };
        let result = save_all_png(&self.rendered_views(), &dir);
        match result {
            Ok(paths) => {
                info!("Saved {} charts to {}", paths.len(), dir.display());
                self.notify(format!("Сохранено графиков: {}", paths.len()));
            }
            Err(e) => {
                log::error!("Failed to save charts: {e}");
                self.notify(format!("Не удалось сохранить графики: {e}"));
            }
        }
    }

    fn save_view(&mut self, index: usize) {
        let Some(view) = self.views.get(index) else {
            return;
        };
        let Some(rendered) = view.rendered.as_ref() else {
            return;
        };
        let Some(path) = FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(format!("{}.png", view.chart.file_stem()))
            .save_file()
        else {
            return;
        };
        if let Err(e) = save_png(rendered, &path) {
            log::error!("Failed to save chart: {e}");
            self.notify(format!("Не удалось сохранить график: {e}"));
        }
    }

    fn chart_control(&mut self, ui: &mut egui::Ui) {
        let mut launch = None;
        match self.settings.layout.control() {
            LaunchControl::Dropdown => {
                ui.label("Выберите график:");
                let selected_text = self.selected.map(|c| c.label()).unwrap_or("");
                egui::ComboBox::from_id_source("interactive_chart_combo")
                    .selected_text(selected_text)
                    .width(200.0)
                    .show_ui(ui, |ui| {
                        for chart in ALL_INTERACTIVE_CHARTS {
                            if ui
                                .selectable_value(&mut self.selected, Some(chart), chart.label())
                                .clicked()
                            {
                                launch = Some(chart);
                            }
                        }
                    });
            }
            LaunchControl::Button(chart) => {
                if ui.button("Показать интерактивный график").clicked() {
                    launch = Some(chart);
                }
            }
        }
        if let Some(chart) = launch {
            self.launch(chart);
        }
    }
}

impl App for VizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Файл", |ui| {
                    if ui.button("Сохранить все графики в PNG…").clicked() {
                        ui.close_menu();
                        self.save_all();
                    }
                    if ui.button("Выход").clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Вид", |ui| {
                    for layout in ALL_LAYOUTS {
                        if ui
                            .radio(self.settings.layout == layout, layout.label())
                            .clicked()
                        {
                            ui.close_menu();
                            self.set_layout(ctx, layout);
                        }
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("chart_control").show(ctx, |ui| {
            ui.horizontal(|ui| self.chart_control(ui));
        });

        let mut save_request = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading(WINDOW_TITLE));
            ui.separator();
            let columns = self.settings.layout.columns();
            egui::ScrollArea::both().show(ui, |ui| {
                egui::Grid::new("chart_grid")
                    .num_columns(columns)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        for (i, view) in self.views.iter().enumerate() {
                            match &view.texture {
                                Some(texture) => {
                                    let resp = ui.add(
                                        egui::Image::new(texture).sense(egui::Sense::click()),
                                    );
                                    resp.on_hover_text(view.chart.title()).context_menu(|ui| {
                                        if ui.button("Сохранить PNG…").clicked() {
                                            save_request = Some(i);
                                            ui.close_menu();
                                        }
                                    });
                                }
                                None => {
                                    ui.label(format!("{}: график недоступен", view.chart.title()));
                                }
                            }
                            if (i + 1) % columns == 0 {
                                ui.end_row();
                            }
                        }
                    });
            });
        });
        if let Some(i) = save_request {
            self.save_view(i);
        }

        if let Some((message, start)) = &self.toast {
            let elapsed = start.elapsed();
            if elapsed < TOAST_DURATION {
                egui::Area::new(egui::Id::new("toast"))
                    .anchor(egui::Align2::RIGHT_TOP, [-10.0, 30.0])
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| ui.label(message.as_str()));
                    });
                ctx.request_repaint_after(TOAST_DURATION - elapsed);
            } else {
                self.toast = None;
            }
        }

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
        if !self.settings.keep_exports {
            let removed = self.exports.cleanup();
            info!("Removed {removed} exported chart directories");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let settings = Settings::load();
    let raw = load_dataset(&settings.dataset, &settings.data_source()).map_err(|e| {
        log::error!("Failed to load dataset {}: {e}", settings.dataset);
        e
    })?;
    let passengers = PassengerSet::prepare(raw);
    if passengers.is_empty() {
        log::warn!("Dataset {} has no rows with both age and fare", settings.dataset);
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Box::new(VizApp::new(&cc.egui_ctx, passengers, settings))),
    )?;
    Ok(())
}
