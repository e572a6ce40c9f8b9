// Layout engine - Vertical stacking of per-agent blocks
use super::panel::{GridPos, Panel};

/// A block whose panels have absolute vertical offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub panels: Vec<Panel>,
    pub start: u32,
    pub height: u32,
}

/// Place `block` starting at row `start`. Panels keep their width, height
/// and horizontal offset; only `y` changes. Panels without a layout get the
/// default full-width layout.
pub fn place(block: &[Panel], start: u32) -> PlacedBlock {
    let mut cursor = start;
    let mut max_bottom = start;
    let mut panels = Vec::with_capacity(block.len());

    for panel in block {
        let mut placed = panel.clone();
        let height = placed.height();
        let grid = placed.grid_pos.get_or_insert_with(GridPos::default);
        grid.y = cursor;
        cursor += height;
        max_bottom = max_bottom.max(grid.y + height);
        panels.push(placed);
    }

    PlacedBlock {
        panels,
        start,
        height: max_bottom - start,
    }
}

/// Stacks blocks top to bottom in the order they are pushed.
#[derive(Debug, Default)]
pub struct BlockStack {
    cursor: u32,
    panels: Vec<Panel>,
    blocks: usize,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block right below everything placed so far.
    pub fn push(&mut self, block: &[Panel]) -> &mut Self {
        let placed = place(block, self.cursor);
        tracing::debug!(
            "Placed block {} at y={} (height {}, {} panels)",
            self.blocks,
            placed.start,
            placed.height,
            placed.panels.len()
        );
        self.cursor += placed.height;
        self.panels.extend(placed.panels);
        self.blocks += 1;
        self
    }

    pub fn height(&self) -> u32 {
        self.cursor
    }

    /// Final panel list, numbered once across all blocks.
    pub fn finish(self) -> Vec<Panel> {
        let mut panels = self.panels;
        renumber(&mut panels);
        panels
    }
}

/// Assign identifiers 1..=N in list order. Run once over the whole
/// dashboard, never per block.
pub fn renumber(panels: &mut [Panel]) {
    for (idx, panel) in panels.iter_mut().enumerate() {
        panel.id = Some(idx as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(h: u32, w: u32, x: u32, y: u32) -> Option<GridPos> {
        Some(GridPos { h, w, x, y })
    }

    fn agent_block() -> Vec<Panel> {
        vec![
            Panel::header("row", pos(1, 24, 0, 0)),
            Panel::metric("gauge", None, vec![], pos(8, 12, 0, 1)),
            Panel::metric("gauge", None, vec![], pos(8, 12, 12, 9)),
            Panel::metric("timeseries", None, vec![], pos(8, 24, 0, 17)),
            Panel::metric("table", None, vec![], pos(8, 24, 0, 25)),
        ]
    }

    fn ys(panels: &[Panel]) -> Vec<u32> {
        panels.iter().map(|p| p.grid_pos.unwrap().y).collect()
    }

    #[test]
    fn test_place_stacks_from_offset() {
        let placed = place(&agent_block(), 33);
        assert_eq!(placed.height, 33);
        assert_eq!(ys(&placed.panels), vec![33, 34, 42, 50, 58]);
        // x/w/h untouched
        let g = placed.panels[2].grid_pos.unwrap();
        assert_eq!((g.x, g.w, g.h), (12, 12, 8));
    }

    #[test]
    fn test_place_fills_missing_layout() {
        let block = vec![
            Panel::header("row", None),
            Panel::metric("stat", None, vec![], None),
        ];
        let placed = place(&block, 0);
        assert_eq!(placed.panels[0].grid_pos, Some(GridPos { h: 8, w: 24, x: 0, y: 0 }));
        assert_eq!(placed.panels[1].grid_pos, Some(GridPos { h: 8, w: 24, x: 0, y: 8 }));
        assert_eq!(placed.height, 16);
    }

    #[test]
    fn test_place_does_not_mutate_template() {
        let block = agent_block();
        let before = block.clone();
        place(&block, 100);
        assert_eq!(block, before);
    }

    #[test]
    fn test_place_empty_block() {
        let placed = place(&[], 5);
        assert!(placed.panels.is_empty());
        assert_eq!(placed.height, 0);
    }

    #[test]
    fn test_renumber_is_dense() {
        let mut panels = agent_block();
        panels[0].id = Some(42);
        renumber(&mut panels);
        let ids: Vec<u32> = panels.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stack_two_agents() {
        let mut stack = BlockStack::new();
        stack.push(&agent_block()).push(&agent_block());
        assert_eq!(stack.height(), 66);

        let panels = stack.finish();
        assert_eq!(panels.len(), 10);
        assert_eq!(ys(&panels), vec![0, 1, 9, 17, 25, 33, 34, 42, 50, 58]);
        let ids: Vec<u32> = panels.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_overlap_between_blocks() {
        let block = agent_block();
        let first = place(&block, 0);
        let second = place(&block, first.start + first.height);
        let first_bottom = first.start + first.height;
        for panel in &second.panels {
            assert!(panel.grid_pos.unwrap().y >= first_bottom);
        }
    }
}
