use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config;
use crate::io::persist::PersistentStore;
use crate::model::checkout::{CrewId, InstanceState};
use crate::model::config::AppConfig;
use crate::model::snapshot::{HistoryRecord, HistorySummary, ScheduleSnapshot, parse_date_key};
use crate::model::tool::{Category, InstanceRef, Pool};
use crate::ops::board::Board;
use crate::ops::drop::{DropOutcome, DropZone, resolve_drop};
use crate::ops::report;
use crate::ops::schedule;
use crate::ops::state::{AppState, StateChange};
use crate::ops::validate::{NewTool, parse_quantity, validate_new_tool};

use super::announce::Announcer;
use super::hit_map::HitMap;
use super::input;
use super::render;
use super::theme::Theme;
use super::view::{self, BoardView, Focus};

const TICK: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Keyboard move: an instance is picked up and a target is being chosen
    Move,
    /// A y/n popup blocks all other input
    Confirm,
    AddTool,
    History,
}

/// Keyboard move in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveState {
    pub instance: InstanceRef,
    pub target: DropZone,
}

/// Pointer drag in progress: the ghost label follows the mouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGhost {
    pub instance: InstanceRef,
    pub column: u16,
    pub row: u16,
    /// Nearest drop zone under the pointer, for highlighting
    pub hover: Option<DropZone>,
}

#[derive(Debug, Clone)]
pub enum ConfirmAction {
    Clear,
    LoadSnapshot {
        label: String,
        record: Box<HistoryRecord>,
    },
    DeleteHistory {
        label: String,
        date_key: String,
    },
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::Clear => {
                "Clear all checkouts and broken tools and reset the inventory?".to_string()
            }
            ConfirmAction::LoadSnapshot { label, .. } => {
                format!("Replace the current board with the schedule from {}?", label)
            }
            ConfirmAction::DeleteHistory { label, .. } => {
                format!("Delete the saved schedule for {}?", label)
            }
        }
    }
}

/// Confirmation waiting on y/n, and where to go afterwards
#[derive(Debug, Clone)]
pub struct PendingConfirm {
    pub action: ConfirmAction,
    pub return_mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Quantity,
    Category,
}

/// Add-tool form contents
#[derive(Debug, Clone)]
pub struct AddToolForm {
    pub name: String,
    /// Byte offset into `name`
    pub name_cursor: usize,
    pub quantity: String,
    pub category: Category,
    pub field: FormField,
    pub errors: Vec<String>,
}

impl AddToolForm {
    pub fn new(category: Category) -> Self {
        AddToolForm {
            name: String::new(),
            name_cursor: 0,
            quantity: "1".to_string(),
            category,
            field: FormField::Name,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryBrowser {
    pub entries: Vec<HistorySummary>,
    pub cursor: usize,
}

/// Main application state
pub struct App {
    pub state: AppState,
    pub board: Board,
    pub store: PersistentStore,
    pub config: AppConfig,
    pub theme: Theme,
    pub data_dir: PathBuf,
    pub mode: Mode,
    pub should_quit: bool,
    /// Index into the current focus list
    pub cursor: usize,
    /// First visible line of the pools panel (set by the renderer)
    pub pool_scroll: usize,
    /// First visible row of crew cards (set by the renderer)
    pub crew_scroll: usize,
    pub move_state: Option<MoveState>,
    pub drag: Option<DragGhost>,
    pub confirm: Option<PendingConfirm>,
    pub add_tool: Option<AddToolForm>,
    pub history: Option<HistoryBrowser>,
    pub announcer: Announcer,
    pub hit_map: HitMap,
    /// Set by the state observer and by board edits; cleared on save
    pub dirty: Rc<Cell<bool>>,
    pub last_save: Instant,
    /// Display time of the last successful save
    pub last_saved: Option<String>,
    pub storage_available: bool,
    pub too_small_logged: bool,
    autosave_warned: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        mut store: PersistentStore,
        data_dir: PathBuf,
        today: NaiveDate,
    ) -> Self {
        let theme = Theme::from_config(&config.ui);
        let storage_available = store.is_available();
        let mut state = AppState::new(config.default_inventory());

        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        state.subscribe(Box::new(move |change: &StateChange| {
            if matches!(
                change,
                StateChange::Inventory | StateChange::ToolAdded { .. } | StateChange::Reset
            ) {
                flag.set(true);
            }
            Ok(())
        }));
        state.subscribe(Box::new(|change: &StateChange| {
            tracing::debug!(?change, "state changed");
            Ok(())
        }));

        let last_saved = store.last_update_time();
        let mut app = App {
            state,
            board: Board::new(),
            store,
            config,
            theme,
            data_dir,
            mode: Mode::Navigate,
            should_quit: false,
            cursor: 0,
            pool_scroll: 0,
            crew_scroll: 0,
            move_state: None,
            drag: None,
            confirm: None,
            add_tool: None,
            history: None,
            announcer: Announcer::default(),
            hit_map: HitMap::default(),
            dirty,
            last_save: Instant::now(),
            last_saved,
            storage_available,
            too_small_logged: false,
            autosave_warned: false,
        };
        app.load_startup(today);
        if !app.storage_available {
            app.announcer
                .announce_error("Storage unavailable: changes will not be saved");
        }
        app
    }

    /// Install today's saved board if there is one.
    fn load_startup(&mut self, today: NaiveDate) {
        if let Some(snapshot) = self.store.load_snapshot(today) {
            let (inventory, board) = schedule::restore(&snapshot, &self.config);
            self.state.set_inventory(inventory);
            self.board = board;
            tracing::info!(
                checkouts = self.board.checked_out_count(),
                broken = self.board.broken().len(),
                "restored today's board"
            );
        } else if let Some(inventory) = self.store.load_inventory()
            && !inventory.is_empty()
        {
            self.state.set_inventory(inventory);
            tracing::info!("no board for today, starting from the saved inventory");
        }
        if self.config.ui.expand_stacks {
            self.state.expand_all();
        }
        self.dirty.set(false);
    }

    // -----------------------------------------------------------------------
    // Projection and focus
    // -----------------------------------------------------------------------

    pub fn view(&self) -> BoardView {
        view::project(
            self.state.inventory_ref(),
            &self.state.expanded(),
            &self.board,
            &self.config,
        )
    }

    pub fn focus_list(&self) -> Vec<Focus> {
        self.view().focus_list()
    }

    pub fn focused(&self) -> Option<Focus> {
        self.focus_list().get(self.cursor).cloned()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.focus_list().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Move the cursor onto `focus` if it is still on screen.
    pub fn focus_on(&mut self, focus: &Focus) {
        if let Some(idx) = self.focus_list().iter().position(|f| f == focus) {
            self.cursor = idx;
        } else {
            self.clamp_cursor();
        }
    }

    fn pool_of(&self, instance: &InstanceRef) -> Pool {
        self.state
            .inventory_ref()
            .find(&instance.tool)
            .map(|d| d.category.pool())
            .unwrap_or(Pool::Hand)
    }

    fn date_label(&self, date_key: &str) -> String {
        parse_date_key(date_key)
            .map(|d| d.format(&self.config.format.date).to_string())
            .unwrap_or_else(|| date_key.to_string())
    }

    pub fn snapshot(&self, now: DateTime<Local>) -> ScheduleSnapshot {
        schedule::capture(self.state.inventory_ref(), &self.board, &self.config, now)
    }

    fn mark_dirty(&mut self) {
        self.dirty.set(true);
    }

    // -----------------------------------------------------------------------
    // Drops (shared by pointer and keyboard)
    // -----------------------------------------------------------------------

    /// Resolve a drop, announce it, and clear the dragged ref.
    pub fn apply_drop(
        &mut self,
        instance: &InstanceRef,
        zone: Option<DropZone>,
        now: DateTime<Local>,
    ) -> DropOutcome {
        let outcome = resolve_drop(
            &mut self.board,
            self.state.inventory_ref(),
            self.config.crews.count,
            instance,
            zone,
            now,
        );
        self.state.clear_dragged();
        if outcome.changed() {
            self.mark_dirty();
        }
        if let Some(message) = outcome.announcement(&self.config) {
            self.announcer.announce(message);
        }
        self.clamp_cursor();
        outcome
    }

    pub fn begin_drag(&mut self, instance: InstanceRef, column: u16, row: u16) {
        self.state.set_dragged(instance.clone());
        self.drag = Some(DragGhost {
            instance,
            column,
            row,
            hover: self.hit_map.drop_zone_at(column, row),
        });
    }

    pub fn drag_to(&mut self, column: u16, row: u16) {
        let hover = self.hit_map.drop_zone_at(column, row);
        if let Some(ghost) = &mut self.drag {
            ghost.column = column;
            ghost.row = row;
            ghost.hover = hover;
        }
    }

    /// Release: drop on the nearest zone under the point. The dragged ref
    /// is cleared whatever happens.
    pub fn end_drag(&mut self, column: u16, row: u16, now: DateTime<Local>) -> Option<DropOutcome> {
        let ghost = self.drag.take();
        let dragged = self.state.dragged();
        self.state.clear_dragged();
        // A release only counts for a drag that is still in progress
        let (Some(_), Some(instance)) = (ghost, dragged) else {
            return None;
        };
        let zone = self.hit_map.drop_zone_at(column, row);
        Some(self.apply_drop(&instance, zone, now))
    }

    /// Drop a pointer drag whose release never arrived.
    pub fn abandon_drag(&mut self) {
        if let Some(ghost) = self.drag.take() {
            tracing::debug!(instance = %ghost.instance, "pointer drag abandoned");
            self.state.clear_dragged();
        }
    }

    // -----------------------------------------------------------------------
    // Keyboard move
    // -----------------------------------------------------------------------

    /// Zones a keyboard move cycles through: crews, broken, own pool.
    pub fn move_targets(&self, instance: &InstanceRef) -> Vec<DropZone> {
        let mut targets: Vec<DropZone> = CrewId::all(self.config.crews.count)
            .map(DropZone::Crew)
            .collect();
        targets.push(DropZone::BrokenPool);
        targets.push(DropZone::AvailablePool(self.pool_of(instance)));
        targets
    }

    pub fn start_move(&mut self, instance: InstanceRef) {
        let target = match self.board.state_of(&instance) {
            InstanceState::Available => DropZone::Crew(CrewId(1)),
            _ => DropZone::AvailablePool(self.pool_of(&instance)),
        };
        self.abandon_drag();
        self.state.set_dragged(instance.clone());
        self.announcer.announce(format!(
            "Moving {}: pick a crew, b for broken, a for the pool, Enter to drop",
            instance
        ));
        self.move_state = Some(MoveState { instance, target });
        self.mode = Mode::Move;
    }

    pub fn set_move_target(&mut self, target: DropZone) {
        if let Some(ms) = &mut self.move_state {
            ms.target = target;
        }
    }

    pub fn cycle_move_target(&mut self, forward: bool) {
        let Some(ms) = &self.move_state else {
            return;
        };
        let targets = self.move_targets(&ms.instance);
        let idx = targets.iter().position(|t| *t == ms.target).unwrap_or(0);
        let next = if forward {
            (idx + 1) % targets.len()
        } else {
            (idx + targets.len() - 1) % targets.len()
        };
        self.set_move_target(targets[next]);
    }

    pub fn drop_move(&mut self, now: DateTime<Local>) -> Option<DropOutcome> {
        let ms = self.move_state.take()?;
        self.mode = Mode::Navigate;
        let outcome = self.apply_drop(&ms.instance, Some(ms.target), now);
        if !outcome.changed() {
            self.announcer
                .announce(format!("{} is already there", ms.instance));
        }
        Some(outcome)
    }

    pub fn cancel_move(&mut self) {
        self.move_state = None;
        self.state.clear_dragged();
        self.mode = Mode::Navigate;
        self.announcer.announce("Move cancelled");
    }

    // -----------------------------------------------------------------------
    // Board operations
    // -----------------------------------------------------------------------

    pub fn return_checkout(&mut self, instance: &InstanceRef) -> bool {
        let Some(record) = self.board.return_instance(instance) else {
            return false;
        };
        self.mark_dirty();
        self.announcer.announce(format!(
            "{} returned from {}",
            instance,
            self.config.crew_label(record.crew)
        ));
        self.clamp_cursor();
        true
    }

    pub fn return_all(&mut self) -> usize {
        let count = self.board.return_all();
        match count {
            0 => self.announcer.announce("No tools are checked out"),
            1 => self.announcer.announce("Returned 1 tool to the pool"),
            n => self.announcer.announce(format!("Returned {} tools to the pool", n)),
        }
        if count > 0 {
            self.mark_dirty();
        }
        self.clamp_cursor();
        count
    }

    pub fn clear(&mut self) {
        self.board.clear();
        self.state.reset(self.config.default_inventory());
        self.cursor = 0;
        self.announcer.announce("Board cleared and inventory reset");
    }

    pub fn toggle_stack(&mut self, name: &str) {
        let expanded = self.state.toggle_expanded(name);
        self.announcer.announce(format!(
            "{} {}",
            name,
            if expanded { "expanded" } else { "collapsed" }
        ));
        self.focus_on(&Focus::Stack(name.to_string()));
    }

    pub fn expand_all(&mut self) {
        let focus = self.focused();
        self.state.expand_all();
        self.announcer.announce("All stacks expanded");
        if let Some(f) = focus {
            self.focus_on(&f);
        }
    }

    pub fn collapse_all(&mut self) {
        let focus = self.focused();
        self.state.collapse_all();
        self.announcer.announce("All stacks collapsed");
        match focus {
            Some(Focus::Instance(i)) => self.focus_on(&Focus::Stack(i.tool)),
            Some(f) => self.focus_on(&f),
            None => self.clamp_cursor(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Today slot, inventory, and today's history entry. Returns success.
    pub fn save(&mut self, now: DateTime<Local>) -> bool {
        let snapshot = self.snapshot(now);
        let today_ok = self.store.save_snapshot(&snapshot);
        let inventory_ok = self.store.save_inventory(self.state.inventory_ref());
        let history_ok = self.store.save_to_history(&snapshot, None);
        self.last_save = Instant::now();
        let ok = today_ok && inventory_ok && history_ok;
        if ok {
            self.dirty.set(false);
            self.last_saved = Some(snapshot.last_update_timestamp.clone());
            tracing::info!(date = %snapshot.date, checkouts = snapshot.tool_count(), "saved");
        } else {
            tracing::warn!(today_ok, inventory_ok, history_ok, "save incomplete");
        }
        ok
    }

    pub fn save_with_feedback(&mut self, now: DateTime<Local>) {
        if self.save(now) {
            self.autosave_warned = false;
            self.announcer.announce(format!(
                "Saved at {}",
                now.format(&self.config.format.time)
            ));
        } else {
            self.announcer
                .announce_error("Save failed: changes are kept in memory only");
        }
    }

    pub fn save_to_history(&mut self, now: DateTime<Local>) -> bool {
        let snapshot = self.snapshot(now);
        let ok = self.store.save_to_history(&snapshot, None);
        if ok {
            self.announcer.announce(format!(
                "Saved to history for {}",
                snapshot.date.format(&self.config.format.date)
            ));
        } else {
            self.announcer.announce_error("Could not save to history");
        }
        ok
    }

    /// Periodic work: expire announcements, autosave when dirty.
    pub fn tick(&mut self, at: Instant, now: DateTime<Local>) {
        self.announcer.tick(at);
        let period = Duration::from_secs(self.config.storage.autosave_secs.max(1));
        if self.dirty.get() && at.saturating_duration_since(self.last_save) >= period {
            if self.save(now) {
                self.autosave_warned = false;
            } else if !self.autosave_warned {
                self.autosave_warned = true;
                self.announcer
                    .announce_error("Autosave failed: changes are kept in memory only");
            }
        }
    }

    fn ask(&mut self, action: ConfirmAction) {
        self.abandon_drag();
        self.confirm = Some(PendingConfirm {
            action,
            return_mode: self.mode,
        });
        self.mode = Mode::Confirm;
    }

    pub fn request_clear(&mut self) {
        self.ask(ConfirmAction::Clear);
    }

    pub fn request_load_yesterday(&mut self, today: NaiveDate) {
        match self.store.load_yesterday(today) {
            None => self
                .announcer
                .announce("No saved schedule found for yesterday"),
            Some(record) => {
                let label = self.date_label(&record.date_key);
                self.ask(ConfirmAction::LoadSnapshot {
                    label,
                    record: Box::new(record),
                });
            }
        }
    }

    pub fn request_load_history(&mut self, date_key: &str) {
        match self.store.load_from_history(date_key) {
            None => self.announcer.announce_error(format!(
                "Could not read the saved schedule for {}",
                self.date_label(date_key)
            )),
            Some(record) => {
                let label = self.date_label(date_key);
                self.ask(ConfirmAction::LoadSnapshot {
                    label,
                    record: Box::new(record),
                });
            }
        }
    }

    pub fn request_delete_history(&mut self, date_key: &str) {
        let label = self.date_label(date_key);
        self.ask(ConfirmAction::DeleteHistory {
            label,
            date_key: date_key.to_string(),
        });
    }

    pub fn confirm(&mut self) {
        let Some(pending) = self.confirm.take() else {
            return;
        };
        self.mode = pending.return_mode;
        match pending.action {
            ConfirmAction::Clear => self.clear(),
            ConfirmAction::LoadSnapshot { label, record } => {
                self.history = None;
                self.mode = Mode::Navigate;
                self.load_record(&record, &label);
            }
            ConfirmAction::DeleteHistory { label, date_key } => {
                self.delete_history(&date_key, &label);
            }
        }
    }

    pub fn cancel_confirm(&mut self) {
        if let Some(pending) = self.confirm.take() {
            self.mode = pending.return_mode;
            self.announcer.announce("Cancelled");
        }
    }

    /// Replace state and view with a stored record.
    pub fn load_record(&mut self, record: &HistoryRecord, label: &str) {
        let (inventory, board) = schedule::restore(&record.snapshot, &self.config);
        self.state.set_inventory(inventory);
        self.board = board;
        self.mark_dirty();
        self.cursor = 0;
        self.announcer
            .announce(format!("Loaded schedule from {}", label));
    }

    pub fn open_history(&mut self) {
        if !self.storage_available {
            self.announcer
                .announce_error("History is unavailable: storage cannot be read");
            return;
        }
        self.abandon_drag();
        let entries = self.store.history_summary();
        if entries.is_empty() {
            self.announcer.announce("No history saved yet");
        }
        self.history = Some(HistoryBrowser { entries, cursor: 0 });
        self.mode = Mode::History;
    }

    pub fn close_history(&mut self) {
        self.history = None;
        self.mode = Mode::Navigate;
    }

    fn delete_history(&mut self, date_key: &str, label: &str) {
        if self.store.delete_history_entry(date_key) {
            self.announcer
                .announce(format!("Deleted the saved schedule for {}", label));
        } else {
            self.announcer
                .announce_error(format!("Could not delete the schedule for {}", label));
        }
        let entries = self.store.history_summary();
        if let Some(h) = &mut self.history {
            h.cursor = h.cursor.min(entries.len().saturating_sub(1));
            h.entries = entries;
        }
    }

    // -----------------------------------------------------------------------
    // Add tool
    // -----------------------------------------------------------------------

    pub fn open_add_tool(&mut self) {
        let category = match self.focused() {
            Some(Focus::Stack(name)) => self.state.inventory_ref().find(&name).map(|d| d.category),
            Some(Focus::Instance(i)) => self.state.inventory_ref().find(&i.tool).map(|d| d.category),
            _ => None,
        }
        .unwrap_or(Category::Hammers);
        self.abandon_drag();
        self.add_tool = Some(AddToolForm::new(category));
        self.mode = Mode::AddTool;
    }

    pub fn cancel_add_tool(&mut self) {
        self.add_tool = None;
        self.mode = Mode::Navigate;
    }

    /// Validate the form; on success append the tool and close the form.
    pub fn submit_add_tool(&mut self) -> bool {
        let Some(form) = &self.add_tool else {
            return false;
        };
        let input = NewTool {
            name: form.name.clone(),
            quantity: parse_quantity(&form.quantity),
            category: form.category,
        };
        match validate_new_tool(&input, self.state.inventory_ref(), &self.config.validation) {
            Ok(def) => {
                let message = format!(
                    "Added {} ({}) to {}",
                    def.name,
                    def.quantity,
                    def.category.label()
                );
                let focus = if def.quantity > 1 {
                    Focus::Stack(def.name.clone())
                } else {
                    Focus::Instance(InstanceRef::new(def.name.clone(), 1))
                };
                self.state.add_tool(def);
                self.add_tool = None;
                self.mode = Mode::Navigate;
                self.announcer.announce(message);
                self.focus_on(&focus);
                true
            }
            Err(errors) => {
                self.announcer.announce_error(errors.join(". "));
                if let Some(form) = &mut self.add_tool {
                    form.errors = errors;
                }
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Print
    // -----------------------------------------------------------------------

    pub fn print_report(&mut self, now: DateTime<Local>) -> Option<PathBuf> {
        let snapshot = self.snapshot(now);
        let text = report::render_report(&snapshot, &self.config);
        match report::write_report(&self.data_dir, snapshot.date, &text) {
            Ok(path) => {
                self.announcer
                    .announce(format!("Report written to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "report write failed");
                self.announcer
                    .announce_error(format!("Could not write report: {}", e));
                None
            }
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(data_dir)?;
    let store = PersistentStore::open(data_dir, &config, ephemeral);
    tracing::info!(
        data_dir = %data_dir.display(),
        ephemeral,
        crews = config.crews.count,
        "starting board"
    );

    let mut app = App::new(config, store, data_dir.to_path_buf(), Local::now().date_naive());

    let mut terminal = match setup_terminal() {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            tracing::error!(error = %e, "terminal setup failed");
            return Err(format!("could not start the board ({}); restart toolcrib", e).into());
        }
    };

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    app.save(Local::now());

    restore_terminal();
    terminal.show_cursor()?;

    result.map_err(|e| {
        tracing::error!(error = %e, "event loop failed");
        format!("{}; restart toolcrib", e).into()
    })
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        app.tick(Instant::now(), Local::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
