use std::time::Instant;
use tracing::{debug, error, info, trace};

use crate::document::{Document, sanitize_cell};
use crate::domain::{
    COLLAPSED_PANEL_EM, EM_PER_ROW, HELP_TEXT, LVConfig, LVError, Message, PANEL_PADDING_EM,
};
use crate::fetcher::ContentSource;
use crate::ui::{MIN_CONTENT_HEIGHT, STATUSLINE_HEIGHT, TABLE_HEADER_HEIGHT, TOGGLE_HEIGHT};

#[derive(Debug, PartialEq)]
pub enum Status {
    EMPTY,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelState {
    SHOWN,
    HIDDEN,
}

pub struct Column {
    idx: u16,
    name: String,
    width_label: String,
    render_width: usize,
    data: Vec<String>,
}

impl Column {
    pub fn as_string(&self) -> String {
        format!(
            "{} \"{}\", width: {} ({}), # rows {}",
            self.idx,
            self.name,
            self.render_width,
            self.width_label,
            self.data.len(),
        )
    }
}

#[derive(Clone)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

pub struct UIData {
    pub name: String,
    pub table: Vec<ColumnView>,
    pub nrows: usize,
    pub selected_row: usize,
    pub abs_selected_row: usize,
    pub panel: PanelState,
    pub content: String,
    pub show_popup: bool,
    pub popup_message: String,
    pub layout: UILayout,
    pub last_update: Instant,
    pub status_message: String,
    pub last_status_message_update: Instant,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            table: Vec::new(),
            nrows: 0,
            selected_row: 0,
            abs_selected_row: 0,
            panel: PanelState::HIDDEN,
            content: String::new(),
            show_popup: false,
            popup_message: String::new(),
            layout: UILayout::default(),
            last_update: Instant::now(),
            status_message: String::new(),
            last_status_message_update: Instant::now(),
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct UILayout {
    pub width: usize,
    pub height: usize,
    pub panel_height: usize,
    pub table_height: usize,
    pub content_top: usize,
    pub content_height: usize,
    pub statusline_height: usize,
}

impl UILayout {
    pub fn from_values(
        nrows: usize,
        panel: PanelState,
        ui_width: usize,
        ui_height: usize,
    ) -> Self {
        let usable = ui_height.saturating_sub(STATUSLINE_HEIGHT);

        let panel_height = match panel {
            PanelState::HIDDEN => TOGGLE_HEIGHT,
            PanelState::SHOWN => {
                // The panel grows with the entry count but always leaves
                // room for a minimal content pane.
                let desired = nrows + TOGGLE_HEIGHT + TABLE_HEADER_HEIGHT;
                let max = usable.saturating_sub(MIN_CONTENT_HEIGHT);
                std::cmp::min(desired, std::cmp::max(max, TOGGLE_HEIGHT))
            }
        };
        let table_height = panel_height.saturating_sub(TOGGLE_HEIGHT + TABLE_HEADER_HEIGHT);

        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            panel_height,
            table_height,
            content_top: panel_height,
            content_height: usable.saturating_sub(panel_height),
            statusline_height: STATUSLINE_HEIGHT,
        };
        trace!("Build UILayout: {:?}", layout);
        layout
    }
}

pub struct Model {
    config: LVConfig,
    pub status: Status,
    panel: PanelState,
    name: String,
    columns: Vec<Column>,
    entry_urls: Vec<Option<String>>,
    rendered_entries: usize,
    curser_row: usize,
    offset_row: usize,
    content: String,
    source: Box<dyn ContentSource>,
    show_popup: bool,
    uilayout: UILayout,
    uidata: UIData,
    last_update: Instant,
    status_message: String,
    last_status_message_update: Instant,
}

impl Model {
    pub fn init(
        config: &LVConfig,
        source: Box<dyn ContentSource>,
        ui_width: usize,
        ui_height: usize,
    ) -> Result<Self, LVError> {
        let name = config
            .endpoint
            .rsplit('/')
            .next()
            .unwrap_or("???")
            .to_string();
        let mut model = Self {
            config: config.clone(),
            status: Status::EMPTY,
            panel: PanelState::HIDDEN,
            name,
            columns: Vec::new(),
            entry_urls: Vec::new(),
            rendered_entries: 0,
            curser_row: 0,
            offset_row: 0,
            content: String::new(),
            source,
            show_popup: false,
            uilayout: UILayout::from_values(0, PanelState::HIDDEN, ui_width, ui_height),
            uidata: UIData::empty(),
            last_update: Instant::now(),
            status_message: "Started lv!".to_string(),
            last_status_message_update: Instant::now(),
        };
        model.update_panel_data();
        model.set_status_message("Loading ...".to_string());
        Ok(model)
    }

    /// Fetch the list document from the configured endpoint and render
    /// it. A failed fetch keeps the panel empty; the error kind only
    /// reaches the log and the status line.
    pub fn initialize(&mut self) {
        let endpoint = self.config.endpoint.clone();
        match self.source.fetch_document(&endpoint) {
            Ok(doc) => self.render_list(doc),
            Err(e) => {
                error!("Failed to fetch list document from {endpoint}: {e:?}");
                self.set_status_message("Failed to load list");
            }
        }
    }

    pub fn render_list(&mut self, doc: Document) {
        let start_time = Instant::now();

        self.columns = doc
            .columns
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let data = doc
                    .entries
                    .iter()
                    .map(|e| sanitize_cell(e.field(&c.name)))
                    .collect::<Vec<String>>();
                Column {
                    idx: idx as u16,
                    name: c.name.clone(),
                    width_label: c.width.clone(),
                    render_width: std::cmp::max(c.width_cells(), c.name.len()),
                    data,
                }
            })
            .collect();
        self.entry_urls = doc.entries.iter().map(|e| e.content_url.clone()).collect();
        self.rendered_entries = doc.entries.len();
        self.curser_row = 0;
        self.offset_row = 0;

        let render_duration = start_time.elapsed().as_millis();
        info!(
            "Rendered {} entries in {}ms ...",
            self.rendered_entries, render_duration
        );
        for c in self.columns.iter() {
            debug!("Column: {}", c.as_string());
        }

        self.status = Status::READY;
        // The panel opens itself once after the first successful render
        self.panel = PanelState::SHOWN;
        self.update_panel_data();
        self.set_status_message(format!("Loaded {} entries", self.rendered_entries));
    }

    /// Panel height in em units, the offset the content pane starts at.
    /// Kept in em so the panel scales with the text size.
    pub fn panel_offset_em(&self) -> f64 {
        match self.panel {
            PanelState::SHOWN => (self.rendered_entries + 2) as f64 * EM_PER_ROW + PANEL_PADDING_EM,
            PanelState::HIDDEN => COLLAPSED_PANEL_EM,
        }
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel
    }

    pub fn rendered_entries(&self) -> usize {
        self.rendered_entries
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Message) -> Result<(), LVError> {
        if self.show_popup {
            match message {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            }
        } else {
            match message {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MovePageUp => self.move_selection_up(self.uilayout.table_height + 1),
                Message::MovePageDown => self.move_selection_down(self.uilayout.table_height + 1),
                Message::MoveBeginning => self.move_selection_beginning(),
                Message::MoveEnd => self.move_selection_end(),
                Message::Open => self.open_entry(false),
                Message::OpenAndHide => self.open_entry(true),
                Message::TogglePanel => self.toggle_panel(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit => (),
            }
        }

        self.last_update = Instant::now();
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            PanelState::SHOWN => PanelState::HIDDEN,
            PanelState::HIDDEN => PanelState::SHOWN,
        };
        trace!("Panel toggled to {:?}", self.panel);
        self.update_panel_data();
    }

    fn open_entry(&mut self, hide: bool) {
        if self.rendered_entries == 0 {
            return;
        }
        let idx = self.offset_row + self.curser_row;
        let Some(url) = self.entry_urls[idx].clone() else {
            // Entries without a content url have a disabled activation
            trace!("Entry {idx} has no content url");
            self.set_status_message("Entry has no content");
            return;
        };

        match self.source.fetch_content(&url) {
            Ok(body) => {
                self.content = body;
                self.set_status_message(format!("Loaded {url}"));
            }
            Err(e) => {
                error!("Failed to fetch content from {url}: {e:?}");
                self.set_status_message(format!("Failed to load {url}"));
            }
        }

        // Collapse even if the content load failed, like the double
        // click in the original interface.
        if hide {
            self.panel = PanelState::HIDDEN;
        }
        self.update_panel_data();
    }

    fn show_help(&mut self) {
        self.show_popup = true;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
        self.uidata.last_update = Instant::now();
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.show_popup = false;
        self.uidata.show_popup = false;
        self.uidata.last_update = Instant::now();
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UILayout::from_values(self.rendered_entries, self.panel, width, height);
        self.update_panel_data();
    }

    fn move_selection_beginning(&mut self) {
        self.curser_row = 0;
        self.offset_row = 0;
        self.update_panel_data();
    }

    fn move_selection_end(&mut self) {
        if self.rendered_entries == 0 {
            return;
        }
        if self.uilayout.table_height == 0 {
            // Collapsed panel or a too short terminal, no visible rows
            // to place the curser in
            self.offset_row = self.rendered_entries - 1;
            self.curser_row = 0;
        } else if self.rendered_entries <= self.uilayout.table_height {
            self.offset_row = 0;
            self.curser_row = self.rendered_entries - 1;
        } else {
            self.offset_row = self.rendered_entries - self.uilayout.table_height;
            self.curser_row = self.uilayout.table_height - 1;
        }
        self.update_panel_data();
    }

    fn move_selection_up(&mut self, size: usize) {
        if self.curser_row > 0 {
            // Curser somewhere in the middle
            self.curser_row = self.curser_row.saturating_sub(size);
        } else {
            // Curser at the top, shift the view up
            self.offset_row = self.offset_row.saturating_sub(size);
        }
        self.update_panel_data();
    }

    fn move_selection_down(&mut self, size: usize) {
        if self.rendered_entries == 0 {
            return;
        }
        if self.curser_row + self.offset_row < self.rendered_entries - 1 {
            if self.curser_row + size < self.uilayout.table_height {
                // Somewhere in the middle of the table
                self.curser_row =
                    std::cmp::min(self.curser_row + size, self.rendered_entries - 1);
            } else {
                // At the bottom, need to shift the view down
                self.offset_row = std::cmp::min(
                    self.offset_row + size,
                    self.rendered_entries
                        .saturating_sub(self.uilayout.table_height),
                );
                self.curser_row = std::cmp::min(
                    self.uilayout.table_height.saturating_sub(1),
                    self.rendered_entries - self.offset_row - 1,
                );
            }
            self.update_panel_data();
        }
    }

    // ----------------------- View data construction ----------------------- //

    fn update_panel_data(&mut self) {
        self.uilayout = UILayout::from_values(
            self.rendered_entries,
            self.panel,
            self.uilayout.width,
            self.uilayout.height,
        );

        // Growing the view again (e.g. after showing the panel) can
        // leave the offset past the last full page
        if self.uilayout.table_height > 0 {
            self.offset_row = std::cmp::min(
                self.offset_row,
                self.rendered_entries
                    .saturating_sub(self.uilayout.table_height),
            );
        }

        let rbegin = self.offset_row;
        let rend = std::cmp::min(rbegin + self.uilayout.table_height, self.rendered_entries);

        // Shrinking the view can leave the curser outside of it
        if rend > rbegin {
            self.curser_row = std::cmp::min(self.curser_row, rend - rbegin - 1);
        } else {
            self.curser_row = 0;
        }

        trace!(
            "Panel: {:?}, Cr {}, Or {}, Rb {}, Re {}, th: {}, uiw: {}, uih: {}",
            self.panel,
            self.curser_row,
            self.offset_row,
            rbegin,
            rend,
            self.uilayout.table_height,
            self.uilayout.width,
            self.uilayout.height
        );

        let table = self
            .columns
            .iter()
            .map(|column| ColumnView {
                name: column.name.clone(),
                width: column.render_width,
                data: column.data[rbegin..rend].to_vec(),
            })
            .collect::<Vec<ColumnView>>();

        self.uidata = UIData {
            name: self.name.clone(),
            table,
            nrows: self.rendered_entries,
            selected_row: self.curser_row,
            abs_selected_row: self.offset_row + self.curser_row,
            panel: self.panel,
            content: self.content.clone(),
            show_popup: self.show_popup,
            popup_message: self.uidata.popup_message.clone(),
            layout: self.uilayout.clone(),
            last_update: Instant::now(),
            status_message: self.status_message.clone(),
            last_status_message_update: self.last_status_message_update,
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_status_message_update = self.last_status_message_update;
        self.uidata.last_update = Instant::now();
    }
}
