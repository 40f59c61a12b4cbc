//! Row-level reconciliation between desired and rendered display text

use crate::display::{DisplaySink, Glyph};
use crate::outcome::{fit_rows, Rows, ROWS};

/// What each row is known to show; `None` means unknown and forces a write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedState {
    rows: [Option<String>; ROWS],
}

impl RenderedState {
    /// State in which every row will be rewritten
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Every row known to hold `blank`
    pub fn blank(blank: &str) -> Self {
        Self {
            rows: std::array::from_fn(|_| Some(blank.to_string())),
        }
    }

    pub fn row(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.as_deref())
    }
}

/// Writes only the rows whose text changed
#[derive(Debug, Clone)]
pub struct DisplayReconciler {
    blank: String,
}

impl DisplayReconciler {
    pub fn new(width: usize) -> Self {
        Self {
            blank: " ".repeat(width),
        }
    }

    /// Bring `sink` from `previous` to `target`, returning what is now shown
    ///
    /// A row is recorded only after both its clear and its write succeed; a
    /// failed row becomes unknown so the next render retries it.
    pub async fn render(
        &self,
        sink: &mut dyn DisplaySink,
        target: &Rows,
        previous: &RenderedState,
    ) -> RenderedState {
        let mut next = previous.clone();
        for (row, text) in target.iter().enumerate() {
            if previous.row(row) == Some(text.as_str()) {
                continue;
            }
            next.rows[row] = match self.write_row(sink, text, row).await {
                Ok(()) => Some(text.clone()),
                Err(e) => {
                    tracing::error!("Failed to write display row {}: {}", row, e);
                    None
                }
            };
        }
        next
    }

    /// Blank the whole display
    pub async fn clear_all(&self, sink: &mut dyn DisplaySink) -> RenderedState {
        match sink.clear().await {
            Ok(()) => RenderedState::blank(&self.blank),
            Err(e) => {
                tracing::error!("Failed to clear display: {}", e);
                RenderedState::unknown()
            }
        }
    }

    async fn write_row(
        &self,
        sink: &mut dyn DisplaySink,
        text: &str,
        row: usize,
    ) -> crate::Result<()> {
        sink.write_line(&self.blank, row).await?;
        sink.write_line(text, row).await
    }
}

/// A display sink together with what it is known to show
pub struct Screen {
    sink: Box<dyn DisplaySink>,
    reconciler: DisplayReconciler,
    rendered: RenderedState,
    width: usize,
}

impl Screen {
    pub fn new(sink: Box<dyn DisplaySink>, width: usize) -> Self {
        Self {
            sink,
            reconciler: DisplayReconciler::new(width),
            rendered: RenderedState::unknown(),
            width,
        }
    }

    pub fn rendered(&self) -> &RenderedState {
        &self.rendered
    }

    /// Fit `rows` to the display width and write whatever changed
    pub async fn show(&mut self, rows: &Rows) {
        let target = fit_rows(rows, self.width);
        self.rendered = self
            .reconciler
            .render(self.sink.as_mut(), &target, &self.rendered)
            .await;
    }

    /// Replace one row, keeping the other as rendered
    pub async fn show_row(&mut self, row: usize, text: &str) {
        let mut target: Rows = Default::default();
        for (i, slot) in target.iter_mut().enumerate() {
            *slot = self.rendered.row(i).unwrap_or_default().to_string();
        }
        match target.get_mut(row) {
            Some(slot) => *slot = text.to_string(),
            None => {
                tracing::warn!("Ignoring write to missing display row {}", row);
                return;
            }
        }
        self.show(&target).await;
    }

    pub async fn clear(&mut self) {
        self.rendered = self.reconciler.clear_all(self.sink.as_mut()).await;
    }

    /// Clear, then show `rows` on the blank display
    pub async fn show_fresh(&mut self, rows: &Rows) {
        self.clear().await;
        self.show(rows).await;
    }

    pub async fn set_backlight(&mut self, on: bool) -> crate::Result<()> {
        self.sink.set_backlight(on).await
    }

    pub async fn load_custom_glyphs(&mut self, glyphs: &[Glyph]) -> crate::Result<()> {
        self.sink.load_custom_glyphs(glyphs).await
    }
}
