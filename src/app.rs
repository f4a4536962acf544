use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Utc};
use eframe::egui::{self, Color32, RichText};
use tracing::{error, info};

use crate::client::{ApiError, ReportsClient};
use crate::config::AppConfig;
use crate::export::{self, ExportError};
use crate::models::{LookupOutcome, Report, OS_UPDATE_CHOICES};

// ── View state ──────────────────────────────────────────────────
// Each pane is a value the resolving operation replaces wholesale;
// nothing is diffed or merged.

enum ReportsPane {
    Loading,
    Empty,
    Failed,
    Loaded {
        reports: Vec<Report>,
        fetched_at: DateTime<Utc>,
    },
}

enum LookupPane {
    Idle,
    Loading,
    NotFound(String),
    Failed,
    Found(Report),
}

/// Outcome of an in-flight request, tagged with the sequence number the
/// request was issued under so stale responses can be dropped.
enum UiMsg {
    Reports {
        seq: u64,
        outcome: Result<Option<Vec<Report>>, ApiError>,
    },
    Lookup {
        seq: u64,
        outcome: Result<LookupOutcome, ApiError>,
    },
    Export(Result<Option<PathBuf>, ExportError>),
}

// ── App ─────────────────────────────────────────────────────────

pub struct DashboardApp {
    client: ReportsClient,
    rt: tokio::runtime::Runtime,
    export_path: PathBuf,

    tx: Sender<UiMsg>,
    rx: Receiver<UiMsg>,

    /// Selected OS-update status; empty = all.
    os_filter: String,
    /// Free-text device id, sent to the backend exactly as typed.
    device_id: String,

    reports_pane: ReportsPane,
    reports_seq: u64,
    lookup_pane: LookupPane,
    lookup_seq: u64,
    export_notice: Option<String>,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: ReportsClient,
        cfg: &AppConfig,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        let (tx, rx) = mpsc::channel();

        let mut app = Self {
            client,
            rt,
            export_path: cfg.export.path.clone(),
            tx,
            rx,
            os_filter: String::new(),
            device_id: String::new(),
            reports_pane: ReportsPane::Loading,
            reports_seq: 0,
            lookup_pane: LookupPane::Idle,
            lookup_seq: 0,
            export_notice: None,
        };

        // Initial load
        app.refresh_reports(&cc.egui_ctx);
        app
    }

    // ── Operations ──────────────────────────────────────────────

    /// Fetch the full collection. Replaces the reports pane when (and only
    /// when) this request is still the newest one for that pane.
    fn refresh_reports(&mut self, ctx: &egui::Context) {
        self.reports_seq += 1;
        let seq = self.reports_seq;
        self.reports_pane = ReportsPane::Loading;

        let client = self.client.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.rt.spawn(async move {
            let outcome = client.all_reports().await;
            if tx.send(UiMsg::Reports { seq, outcome }).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn lookup_device(&mut self, ctx: &egui::Context) {
        self.lookup_seq += 1;
        let seq = self.lookup_seq;
        self.lookup_pane = LookupPane::Loading;

        let client = self.client.clone();
        let device_id = self.device_id.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.rt.spawn(async move {
            let outcome = client.latest_report(&device_id).await;
            if tx.send(UiMsg::Lookup { seq, outcome }).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    /// Export always re-fetches the unfiltered collection; the current
    /// filter never leaks into the file.
    fn export_csv(&mut self, ctx: &egui::Context) {
        let client = self.client.clone();
        let path = self.export_path.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.rt.spawn(async move {
            let outcome = export::export_reports(&client, &path).await;
            if tx.send(UiMsg::Export(outcome)).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    // ── Response handling ───────────────────────────────────────

    fn apply_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMsg::Reports { seq, outcome } => {
                    if seq != self.reports_seq {
                        continue; // a newer fetch owns the pane
                    }
                    self.reports_pane = match outcome {
                        Ok(Some(reports)) if !reports.is_empty() => ReportsPane::Loaded {
                            reports,
                            fetched_at: Utc::now(),
                        },
                        // Non-sequence bodies land here too
                        Ok(_) => ReportsPane::Empty,
                        Err(e) => {
                            error!("Error fetching all reports: {e}");
                            ReportsPane::Failed
                        }
                    };
                }
                UiMsg::Lookup { seq, outcome } => {
                    if seq != self.lookup_seq {
                        continue;
                    }
                    self.lookup_pane = match outcome {
                        Ok(LookupOutcome::Found(report)) => LookupPane::Found(report),
                        Ok(LookupOutcome::NotFound { error }) => LookupPane::NotFound(error),
                        Err(e) => {
                            error!("Fetch error: {e}");
                            LookupPane::Failed
                        }
                    };
                }
                UiMsg::Export(outcome) => match outcome {
                    Ok(Some(path)) => {
                        info!("Report set exported → {}", path.display());
                        self.export_notice = Some(format!("Saved {}", path.display()));
                    }
                    Ok(None) => {} // body was not a report list; nothing to export
                    Err(e) => {
                        error!("CSV export failed: {e}");
                        self.export_notice = Some("Failed to export CSV".into());
                    }
                },
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    fn toolbar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("OS Update:");
            let previous = self.os_filter.clone();
            egui::ComboBox::from_id_source("os-filter")
                .selected_text(if self.os_filter.is_empty() {
                    "All"
                } else {
                    self.os_filter.as_str()
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.os_filter, String::new(), "All");
                    for choice in OS_UPDATE_CHOICES {
                        ui.selectable_value(&mut self.os_filter, (*choice).to_owned(), *choice);
                    }
                });
            if self.os_filter != previous {
                self.refresh_reports(ctx);
            }

            ui.separator();

            ui.label("Device:");
            ui.add(
                egui::TextEdit::singleline(&mut self.device_id)
                    .hint_text("device_001")
                    .desired_width(140.0),
            );
            if ui.button("Fetch Latest").clicked() {
                self.lookup_device(ctx);
            }

            ui.separator();

            if ui.button("⬇ Export CSV").clicked() {
                self.export_csv(ctx);
            }
        });
    }

    fn lookup_panel(&self, ui: &mut egui::Ui) {
        match &self.lookup_pane {
            LookupPane::Idle => {}
            LookupPane::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Fetching...");
                });
            }
            LookupPane::NotFound(reason) => {
                ui.label(RichText::new(format!("Error: {reason}")).color(Color32::RED));
            }
            LookupPane::Failed => {
                ui.label(RichText::new("Error fetching data").color(Color32::RED));
            }
            LookupPane::Found(report) => {
                ui.heading(format!("Latest Report for {}", report.device_id));
                status_rows(ui, report);
            }
        }
    }

    fn reports_panel(&self, ui: &mut egui::Ui) {
        match &self.reports_pane {
            ReportsPane::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            ReportsPane::Empty => {
                ui.label("No reports found.");
            }
            ReportsPane::Failed => {
                ui.label(RichText::new("Error loading all reports").color(Color32::RED));
            }
            ReportsPane::Loaded {
                reports,
                fetched_at,
            } => {
                ui.label(
                    RichText::new(format!(
                        "Last updated {}",
                        fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
                    ))
                    .size(12.0)
                    .color(Color32::GRAY),
                );
                ui.add_space(4.0);

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        for report in reports.iter().filter(|r| r.matches_os_filter(&self.os_filter))
                        {
                            report_card(ui, report);
                            ui.add_space(7.0);
                        }
                    });
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_messages();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ctx, ui);
        });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(Color32::from_rgb(19, 28, 36))
                    .inner_margin(16.0),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(
                        RichText::new("🖥 Fleetdash")
                            .size(26.0)
                            .color(Color32::from_rgb(60, 180, 255)),
                    );
                    ui.label(
                        RichText::new("Device compliance at a glance.")
                            .size(14.0)
                            .color(Color32::LIGHT_GRAY),
                    );
                });

                ui.add_space(8.0);
                self.lookup_panel(ui);
                ui.add_space(8.0);
                ui.separator();
                self.reports_panel(ui);
            });

        if let Some(notice) = self.export_notice.clone() {
            let mut dismissed = false;
            egui::Window::new("CSV Export")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&notice);
                    if ui.button("Close").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.export_notice = None;
            }
        }
    }
}

// ── Card rendering ──────────────────────────────────────────────

fn report_card(ui: &mut egui::Ui, report: &Report) {
    let issue = report.has_issue();
    let fill = if issue {
        Color32::from_rgb(110, 30, 30)
    } else {
        Color32::from_rgb(30, 42, 54)
    };

    egui::Frame::default()
        .fill(fill)
        .rounding(8.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("Device: {}", report.device_id))
                        .size(16.0)
                        .strong(),
                );
                if issue {
                    ui.label(RichText::new("⚠ issue").color(Color32::YELLOW));
                }
            });
            status_rows(ui, report);
        });
}

fn status_rows(ui: &mut egui::Ui, report: &Report) {
    for (label, value) in [
        ("Timestamp", &report.timestamp),
        ("Disk Encryption", &report.disk_encryption),
        ("OS Update", &report.os_update),
        ("Antivirus", &report.antivirus),
        ("Sleep Settings", &report.sleep_settings),
    ] {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{label}:")).strong());
            ui.label(value);
        });
    }
}
