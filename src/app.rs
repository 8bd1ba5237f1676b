//! Main application UI and state management.
//! Handles flashcard management and review sessions, workout logging and
//! per-exercise strength stats.

use chrono::NaiveDate;
use eframe::egui;
use hobbyhub::analytics::{OneRepMaxFormula, OneRepMaxPoint, TrendMetric};
use hobbyhub::database::{db, flashcards, workouts};
use hobbyhub::export::json;
use hobbyhub::models::{Exercise, Flashcard, Grade, ReviewSession, Workout, WorkoutSet};
use hobbyhub::{AppConfig, Error, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::error;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_STATS_WINDOW: usize = 20;

/// Application screen states
#[derive(Default, PartialEq, Eq, Clone, Copy)]
enum AppScreen {
    #[default]
    Flashcards,
    ReviewSession,
    Workouts,
}

/// Stats of the selected exercise over the chosen window
struct ExerciseStats {
    points: Vec<OneRepMaxPoint>,
    weight_trend: f64,
    one_rep_max_trend: f64,
}

/// Main application state
pub struct HobbyHubApp {
    conn: Arc<Mutex<Connection>>,
    today: NaiveDate,
    current_screen: AppScreen,
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    result_message: Option<String>,

    flashcards: Vec<Flashcard>,
    due_count: usize,
    new_front: String,
    new_back: String,
    review_session: Option<ReviewSession>,

    exercises: Vec<Exercise>,
    workouts: Vec<Workout>,
    new_exercise_name: String,
    new_muscle_group: String,
    workout_date: String,
    pending_sets: Vec<WorkoutSet>,
    set_exercise: Option<Uuid>,
    set_weight: String,
    set_reps: String,

    selected_exercise: Option<Uuid>,
    stats_window: usize,
    formula: OneRepMaxFormula,
    stats: Option<ExerciseStats>,
}

/// Runs `f` with the shared connection locked
fn locked<T>(
    conn: &Arc<Mutex<Connection>>,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    let guard = conn.lock().map_err(|_| Error::LockPoisoned)?;
    f(&guard)
}

fn describe_trend(slope: f64) -> &'static str {
    if slope > 1e-9 {
        "progressing"
    } else if slope < -1e-9 {
        "regressing"
    } else {
        "flat"
    }
}

fn parse_set_input(weight: &str, reps: &str) -> Result<(f64, u32)> {
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid_input(format!("'{}' is not a valid weight", weight.trim())))?;
    let reps = reps
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::invalid_input(format!("'{}' is not a valid rep count", reps.trim())))?;
    Ok((weight, reps))
}

impl eframe::App for HobbyHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);

        match self.current_screen {
            AppScreen::Flashcards => self.render_flashcards_screen(ctx),
            AppScreen::ReviewSession => self.render_review_screen(ctx),
            AppScreen::Workouts => self.render_workouts_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        let mut dismiss = false;
        if let Some(message) = &self.result_message {
            egui::Window::new("Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
        }
        if dismiss {
            self.result_message = None;
        }
    }
}

impl HobbyHubApp {
    /// Creates the application with its data loaded from the database
    pub fn new(conn: Connection, config: AppConfig) -> Result<Self> {
        let today = db::get_current_date(&conn)?;
        let mut app = Self {
            conn: Arc::new(Mutex::new(conn)),
            today,
            current_screen: AppScreen::Flashcards,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            result_message: None,
            flashcards: Vec::new(),
            due_count: 0,
            new_front: String::new(),
            new_back: String::new(),
            review_session: None,
            exercises: Vec::new(),
            workouts: Vec::new(),
            new_exercise_name: String::new(),
            new_muscle_group: String::new(),
            workout_date: today.format(DATE_FORMAT).to_string(),
            pending_sets: Vec::new(),
            set_exercise: None,
            set_weight: String::new(),
            set_reps: String::new(),
            selected_exercise: None,
            stats_window: config.trend_window.min(MAX_STATS_WINDOW),
            formula: config.formula,
            stats: None,
        };
        app.reload_flashcards()?;
        app.reload_workouts()?;
        app.selected_exercise = app.exercises.first().map(|e| e.id);
        app.refresh_stats()?;
        Ok(app)
    }

    fn reload_flashcards(&mut self) -> Result<()> {
        let today = self.today;
        let (all, due) = locked(&self.conn, |conn| {
            Ok((
                flashcards::get_all_flashcards(conn)?,
                flashcards::get_flashcards_due(today, conn)?.len(),
            ))
        })?;
        self.flashcards = all;
        self.due_count = due;
        Ok(())
    }

    fn reload_workouts(&mut self) -> Result<()> {
        let (exercises, logged) = locked(&self.conn, |conn| {
            Ok((
                workouts::get_all_exercises(conn)?,
                workouts::get_all_workouts(conn)?,
            ))
        })?;
        self.exercises = exercises;
        self.workouts = logged;

        let known = |id: &Uuid| self.exercises.iter().any(|e| e.id == *id);
        if !self.selected_exercise.as_ref().is_some_and(known) {
            self.selected_exercise = self.exercises.first().map(|e| e.id);
        }
        if !self.set_exercise.as_ref().is_some_and(known) {
            self.set_exercise = self.exercises.first().map(|e| e.id);
        }
        Ok(())
    }

    fn refresh_stats(&mut self) -> Result<()> {
        let Some(exercise_id) = self.selected_exercise else {
            self.stats = None;
            return Ok(());
        };

        let (window, formula) = (self.stats_window, self.formula);
        let stats = locked(&self.conn, |conn| {
            Ok(ExerciseStats {
                points: workouts::one_rep_max_stats(exercise_id, window, formula, conn)?,
                weight_trend: workouts::overload_trend(
                    exercise_id,
                    window,
                    TrendMetric::TopSetWeight,
                    conn,
                )?,
                one_rep_max_trend: workouts::overload_trend(
                    exercise_id,
                    window,
                    TrendMetric::EstimatedOneRepMax(formula),
                    conn,
                )?,
            })
        })?;
        self.stats = Some(stats);
        Ok(())
    }

    /// Shows the outcome of a user action; failures are also logged.
    fn report(&mut self, result: Result<String>) {
        match result {
            Ok(message) => self.result_message = Some(message),
            Err(e) => {
                error!("{}", e);
                self.result_message = Some(format!("Error: {}", e));
            }
        }
    }

    fn report_error(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.report(Err(e));
        }
    }

    /// Renders the date bar and screen switcher
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let mut advance = false;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.today.format(DATE_FORMAT).to_string());
                if ui.button("Next Day").clicked() {
                    advance = true;
                }

                ui.separator();

                if self.current_screen != AppScreen::ReviewSession {
                    ui.selectable_value(
                        &mut self.current_screen,
                        AppScreen::Flashcards,
                        "Flashcards",
                    );
                    ui.selectable_value(&mut self.current_screen, AppScreen::Workouts, "Workouts");
                }
            });
        });

        if advance {
            let result = locked(&self.conn, db::advance_day).and_then(|today| {
                self.today = today;
                self.reload_flashcards()
            });
            self.report_error(result);
        }
    }

    /// Renders flashcard management
    fn render_flashcards_screen(&mut self, ctx: &egui::Context) {
        let mut action_add = false;
        let mut action_review = false;
        let mut action_export = false;
        let mut action_import = false;
        let mut action_delete: Option<String> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(
                        self.due_count > 0,
                        egui::Button::new(format!("Review Due ({})", self.due_count)),
                    )
                    .clicked()
                {
                    action_review = true;
                }
                if ui.button("Export Flashcards").clicked() {
                    action_export = true;
                }
                if ui.button("Import Flashcards").clicked() {
                    action_import = true;
                }
            });

            ui.separator();

            ui.heading("Add Flashcard");
            ui.horizontal(|ui| {
                ui.label("Front:");
                ui.text_edit_singleline(&mut self.new_front);
            });
            ui.horizontal(|ui| {
                ui.label("Back:");
                ui.text_edit_singleline(&mut self.new_back);
            });
            if ui.button("Add Flashcard").clicked() {
                action_add = true;
            }

            ui.separator();

            ui.heading(format!("Flashcards ({})", self.flashcards.len()));
            egui::ScrollArea::vertical()
                .id_source("flashcards_list")
                .show(ui, |ui| {
                    for card in &self.flashcards {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(format!("{} → {}", card.front, card.back));
                                    ui.small(format!(
                                        "Next review {} · interval {} d · EF {:.2}",
                                        card.review.next_review_on.format(DATE_FORMAT),
                                        card.review.interval_days,
                                        card.review.easiness_factor
                                    ));
                                });
                                if ui.button("Delete").clicked() {
                                    action_delete = Some(card.front.clone());
                                }
                            });
                        });
                    }
                });
        });

        // Execute deferred actions
        if action_add {
            let (front, back, today) = (self.new_front.clone(), self.new_back.clone(), self.today);
            let result = locked(&self.conn, |conn| {
                flashcards::add_flashcard(&front, &back, today, conn)
            })
            .and_then(|_| self.reload_flashcards());
            if result.is_ok() {
                self.new_front.clear();
                self.new_back.clear();
            }
            self.report_error(result);
        }
        if let Some(front) = action_delete {
            let result = locked(&self.conn, |conn| flashcards::delete_flashcard(&front, conn))
                .and_then(|_| self.reload_flashcards());
            self.report_error(result);
        }
        if action_review {
            self.start_review_session();
        }
        if action_export {
            self.handle_flashcard_export();
        }
        if action_import {
            self.handle_flashcard_import();
        }
    }

    /// Renders the review session screen
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let mut action_back = false;
        let mut action_toggle = false;
        let mut action_grade: Option<Grade> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.review_session else {
                action_back = true;
                return;
            };

            ui.heading("Review");
            ui.label(session.phase_message());
            ui.label(format!(
                "Progress: {} / {} recalled ({} remaining)",
                session.passed_count(),
                session.total_count(),
                session.remaining_count()
            ));

            ui.add_space(20.0);

            if session.is_completed() {
                ui.heading("Congratulations!");
                ui.label("You've reviewed every due card.");
                ui.add_space(20.0);
                if ui.button("Back to Flashcards").clicked() {
                    action_back = true;
                }
                return;
            }

            let Some(card) = session.current_card() else {
                return;
            };
            let show_back = session.show_back;

            ui.group(|ui| {
                ui.set_min_height(200.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.heading("Front:");
                    ui.label(&card.flashcard.front);
                    ui.add_space(20.0);
                    if show_back {
                        ui.heading("Back:");
                        ui.label(&card.flashcard.back);
                    } else {
                        ui.label("(Click 'Show Back' to reveal)");
                    }
                    ui.add_space(20.0);
                });
            });

            ui.add_space(20.0);

            if !show_back {
                if ui.button("Show Back").clicked() {
                    action_toggle = true;
                }
            } else {
                ui.label("Rate your recall:");
                let (lapses, passes): (Vec<_>, Vec<_>) =
                    Grade::all().partition(|(grade, _)| grade.is_lapse());
                for row in [lapses, passes] {
                    ui.horizontal(|ui| {
                        for (grade, label) in row {
                            if ui.button(format!("{} - {}", grade.value(), label)).clicked() {
                                action_grade = Some(grade);
                            }
                        }
                    });
                }
            }

            ui.add_space(20.0);

            if ui.button("Back to Flashcards").clicked() {
                action_back = true;
            }
        });

        // Execute deferred actions
        let mut grade_result = Ok(());
        if let Some(session) = &mut self.review_session {
            if action_toggle {
                session.toggle_back();
            }
            if let Some(grade) = action_grade {
                grade_result = session.grade_current_card(grade);
                if grade_result.is_ok() {
                    session.next_card();
                }
            }
        }
        self.report_error(grade_result);
        if action_back {
            self.current_screen = AppScreen::Flashcards;
            self.review_session = None;
            let result = self.reload_flashcards();
            self.report_error(result);
        }
    }

    /// Renders exercises, workout logging and stats
    fn render_workouts_screen(&mut self, ctx: &egui::Context) {
        let mut action_add_exercise = false;
        let mut action_delete_exercise: Option<Uuid> = None;
        let mut action_add_set = false;
        let mut action_save_workout = false;
        let mut action_delete_workout: Option<Uuid> = None;
        let mut action_export = false;
        let mut action_import = false;
        let mut stats_changed = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("workouts_screen")
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Export Workouts").clicked() {
                            action_export = true;
                        }
                        if ui.button("Import Workouts").clicked() {
                            action_import = true;
                        }
                    });

                    ui.separator();

                    ui.heading("Add Exercise");
                    ui.horizontal(|ui| {
                        ui.label("Name:");
                        ui.text_edit_singleline(&mut self.new_exercise_name);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Muscle group:");
                        ui.text_edit_singleline(&mut self.new_muscle_group);
                    });
                    if ui.button("Add Exercise").clicked() {
                        action_add_exercise = true;
                    }

                    ui.separator();

                    ui.heading(format!("Exercises ({})", self.exercises.len()));
                    for exercise in &self.exercises {
                        ui.horizontal(|ui| {
                            let selected = self.selected_exercise == Some(exercise.id);
                            if ui
                                .selectable_label(
                                    selected,
                                    format!("{} ({})", exercise.name, exercise.muscle_group),
                                )
                                .clicked()
                            {
                                self.selected_exercise = Some(exercise.id);
                                stats_changed = true;
                            }
                            if ui.button("Delete").clicked() {
                                action_delete_exercise = Some(exercise.id);
                            }
                        });
                    }

                    ui.separator();

                    ui.heading("Log Workout");
                    ui.horizontal(|ui| {
                        ui.label("Date (YYYY-MM-DD):");
                        ui.text_edit_singleline(&mut self.workout_date);
                    });
                    ui.horizontal(|ui| {
                        let selected_name = self
                            .set_exercise
                            .and_then(|id| self.exercises.iter().find(|e| e.id == id))
                            .map(|e| e.name.clone())
                            .unwrap_or_default();
                        egui::ComboBox::from_label("Exercise")
                            .selected_text(selected_name)
                            .show_ui(ui, |ui| {
                                for exercise in &self.exercises {
                                    ui.selectable_value(
                                        &mut self.set_exercise,
                                        Some(exercise.id),
                                        &exercise.name,
                                    );
                                }
                            });
                    });
                    ui.horizontal(|ui| {
                        ui.label("Weight (kg):");
                        ui.add(egui::TextEdit::singleline(&mut self.set_weight).desired_width(60.0));
                        ui.label("Reps:");
                        ui.add(egui::TextEdit::singleline(&mut self.set_reps).desired_width(40.0));
                        if ui.button("Add Set").clicked() {
                            action_add_set = true;
                        }
                    });

                    for set in &self.pending_sets {
                        let name = self
                            .exercises
                            .iter()
                            .find(|e| e.id == set.exercise_id)
                            .map(|e| e.name.as_str())
                            .unwrap_or("?");
                        ui.label(format!(
                            "{}. {} {} kg × {}",
                            set.order + 1,
                            name,
                            set.weight_kg,
                            set.reps
                        ));
                    }
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(
                                !self.pending_sets.is_empty(),
                                egui::Button::new("Save Workout"),
                            )
                            .clicked()
                        {
                            action_save_workout = true;
                        }
                        if ui.button("Clear").clicked() {
                            self.pending_sets.clear();
                        }
                    });

                    ui.separator();

                    self.render_stats(ui, &mut stats_changed);

                    ui.separator();

                    ui.heading(format!("Workouts ({})", self.workouts.len()));
                    for workout in &self.workouts {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.label(workout.performed_on.format(DATE_FORMAT).to_string());
                                if ui.button("Delete").clicked() {
                                    action_delete_workout = Some(workout.id);
                                }
                            });
                            for set in &workout.sets {
                                let name = self
                                    .exercises
                                    .iter()
                                    .find(|e| e.id == set.exercise_id)
                                    .map(|e| e.name.as_str())
                                    .unwrap_or("?");
                                ui.small(format!(
                                    "{} {} kg × {}",
                                    name, set.weight_kg, set.reps
                                ));
                            }
                        });
                    }
                });
        });

        // Execute deferred actions
        let mut workouts_changed = false;

        if action_add_exercise {
            let (name, group) = (
                self.new_exercise_name.clone(),
                self.new_muscle_group.clone(),
            );
            let result = locked(&self.conn, |conn| workouts::add_exercise(&name, &group, conn));
            if result.is_ok() {
                self.new_exercise_name.clear();
                self.new_muscle_group.clear();
                workouts_changed = true;
            }
            self.report_error(result.map(|_| ()));
        }
        if let Some(id) = action_delete_exercise {
            let result = locked(&self.conn, |conn| workouts::delete_exercise(id, conn));
            workouts_changed |= result.is_ok();
            self.report_error(result);
        }
        if action_add_set {
            let result = self.add_pending_set();
            self.report_error(result);
        }
        if action_save_workout {
            let result = self.save_pending_workout();
            workouts_changed |= result.is_ok();
            self.report_error(result);
        }
        if let Some(id) = action_delete_workout {
            let result = locked(&self.conn, |conn| workouts::delete_workout(id, conn));
            workouts_changed |= result.is_ok();
            self.report_error(result);
        }
        if action_export {
            self.handle_workout_export();
        }
        if action_import {
            workouts_changed |= self.handle_workout_import();
        }

        if workouts_changed {
            let result = self.reload_workouts();
            self.report_error(result);
        }
        if workouts_changed || stats_changed {
            let result = self.refresh_stats();
            self.report_error(result);
        }
    }

    /// Renders the 1RM table and trend of the selected exercise
    fn render_stats(&mut self, ui: &mut egui::Ui, stats_changed: &mut bool) {
        let name = self
            .selected_exercise
            .and_then(|id| self.exercises.iter().find(|e| e.id == id))
            .map(|e| e.name.clone());
        let Some(name) = name else {
            ui.label("Select an exercise to see its stats");
            return;
        };

        ui.heading(format!("Stats: {}", name));
        ui.horizontal(|ui| {
            *stats_changed |= ui
                .add(
                    egui::Slider::new(&mut self.stats_window, 1..=MAX_STATS_WINDOW)
                        .text("last sessions"),
                )
                .changed();

            let before = self.formula;
            egui::ComboBox::from_label("Formula")
                .selected_text(self.formula.to_string())
                .show_ui(ui, |ui| {
                    for formula in OneRepMaxFormula::ALL {
                        ui.selectable_value(&mut self.formula, formula, formula.name());
                    }
                });
            *stats_changed |= before != self.formula;
        });

        let Some(stats) = &self.stats else {
            return;
        };

        if stats.points.is_empty() {
            ui.label("No sets logged yet");
            return;
        }

        egui::Grid::new("one_rep_max_grid")
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Estimated 1RM (kg)");
                ui.end_row();
                for point in &stats.points {
                    ui.label(point.performed_on.format(DATE_FORMAT).to_string());
                    ui.label(format!("{:.1}", point.one_rep_max));
                    ui.end_row();
                }
            });

        ui.label(format!(
            "Top-set trend: {:+.2} kg/session ({})",
            stats.weight_trend,
            describe_trend(stats.weight_trend)
        ));
        ui.label(format!(
            "1RM trend: {:+.2} kg/session ({})",
            stats.one_rep_max_trend,
            describe_trend(stats.one_rep_max_trend)
        ));
    }

    fn add_pending_set(&mut self) -> Result<()> {
        let exercise_id = self
            .set_exercise
            .ok_or_else(|| Error::invalid_input("Pick an exercise first"))?;
        let (weight_kg, reps) = parse_set_input(&self.set_weight, &self.set_reps)?;

        let set = WorkoutSet {
            order: self.pending_sets.len() as u32,
            exercise_id,
            weight_kg,
            reps,
        };
        set.validate()?;

        self.pending_sets.push(set);
        self.set_weight.clear();
        self.set_reps.clear();
        Ok(())
    }

    fn save_pending_workout(&mut self) -> Result<()> {
        let performed_on = NaiveDate::parse_from_str(self.workout_date.trim(), DATE_FORMAT)
            .map_err(|_| {
                Error::invalid_input(format!("'{}' is not a YYYY-MM-DD date", self.workout_date))
            })?;

        let sets = self.pending_sets.clone();
        locked(&self.conn, |conn| {
            workouts::create_workout(performed_on, &sets, conn)
        })?;
        self.pending_sets.clear();
        Ok(())
    }

    /// Starts a review session with the cards due today
    fn start_review_session(&mut self) {
        let today = self.today;
        match locked(&self.conn, |conn| flashcards::get_flashcards_due(today, conn)) {
            Ok(due) if !due.is_empty() => {
                self.review_session =
                    Some(ReviewSession::new(due, today, Arc::clone(&self.conn)));
                self.current_screen = AppScreen::ReviewSession;
            }
            Ok(_) => {}
            Err(e) => self.report(Err(e)),
        }
    }

    /// Handles flashcard export to a JSON file
    fn handle_flashcard_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("flashcards.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let result = json::export_flashcards_to_path(&self.flashcards, &path)
            .map(|_| format!("Exported {} flashcards", self.flashcards.len()));
        self.report(result);
    }

    /// Handles flashcard import from a JSON file
    fn handle_flashcard_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let result = locked(&self.conn, |conn| json::import_flashcards_into(&path, conn))
            .and_then(|summary| {
                self.reload_flashcards()?;
                Ok(format!(
                    "Imported {} flashcards ({} already existed)",
                    summary.added, summary.skipped
                ))
            });
        self.report(result);
    }

    fn handle_workout_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("workouts.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let result = locked(&self.conn, |conn| json::export_workout_log_to_path(conn, &path))
            .map(|log| format!("Exported {} workouts", log.workouts.len()));
        self.report(result);
    }

    /// Returns true when workouts were added
    fn handle_workout_import(&mut self) -> bool {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return false;
        };

        let result = locked(&self.conn, |conn| json::import_workout_log_into(&path, conn));
        let imported = result.is_ok();
        self.report(result.map(|summary| format!("Imported {} workouts", summary.added)));
        imported
    }
}
