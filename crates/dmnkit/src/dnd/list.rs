//! The drag-and-drop list engine.
//!
//! Rows live on a grid: `y` is the row index and `x` the nesting level. A
//! gesture is `start_drag`, any number of `drag` calls, then `drop`. While a
//! row is dragged, its dependents (the run of deeper rows right below it)
//! move along with it. After every drop the list is consolidated so that the
//! first visible row sits at level 0 and every row is at most one level
//! deeper than the row above it.

use log::{debug, trace};

use super::position::{DndItem, HIDDEN, Position};
use crate::config::DndConfig;

/// Cursor coordinates relative to the top-left corner of the drag area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MousePosition {
    pub x: i32,
    pub y: i32,
}

impl MousePosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
struct DragState {
    key: String,
    dependents: Vec<String>,
}

/// Rows of a hierarchical list and the state of the gesture in progress.
#[derive(Debug, Clone)]
pub struct DndList {
    config: DndConfig,
    items: Vec<DndItem>,
    drag: Option<DragState>,
    area_height: i32,
}

impl DndList {
    pub fn new(config: DndConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            drag: None,
            area_height: 0,
        }
    }

    pub fn config(&self) -> &DndConfig {
        &self.config
    }

    /// Rows in registration order, or in row order after a refresh.
    pub fn items(&self) -> &[DndItem] {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&DndItem> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Height of the drag area in pixels.
    pub fn area_height(&self) -> i32 {
        self.area_height
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragging_key(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.key.as_str())
    }

    pub fn hover_key(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.is_hover())
            .map(DndItem::key)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.drag = None;
        self.area_height = 0;
    }

    /// Appends a row below every registered row, at level 0.
    pub fn register_item(&mut self, key: impl Into<String>) -> &DndItem {
        let max_y = self.items.iter().map(DndItem::y).max().unwrap_or(HIDDEN);
        let index = self.items.len();
        self.items.push(DndItem::new(key, Position::new(0, max_y + 1)));
        &self.items[index]
    }

    pub fn set_position_x(&mut self, key: &str, x: i32) {
        if let Some(index) = self.index_of(key) {
            self.items[index].set_x(x);
        }
    }

    pub fn set_position_y(&mut self, key: &str, y: i32) {
        if let Some(index) = self.index_of(key) {
            self.items[index].set_y(y);
        }
    }

    /// The first row at index `y`.
    pub fn item_at(&self, y: i32) -> Option<&DndItem> {
        self.index_at(y).map(|index| &self.items[index])
    }

    /// Derives pixel offsets from grid positions and sizes the drag area
    /// to the visible rows.
    pub fn refresh_items_position(&mut self) {
        let height = self.config.item_height();
        let indentation = self.config.indentation_size();
        let mut visible = 0;

        for item in &mut self.items {
            let position = item.position();
            item.set_top(position.y * height);
            item.set_margin(position.x * indentation);
            if position.is_visible() {
                visible += 1;
            }
        }

        self.area_height = visible * height + 1;
    }

    /// Orders the rows by their `y`.
    pub fn refresh_items_html(&mut self) {
        self.items.sort_by_key(DndItem::y);
    }

    pub fn refresh_items_position_and_html(&mut self) {
        self.consolidate_hierarchical_level();
        self.refresh_items_position();
        self.refresh_items_html();
    }

    /// Restores the depth invariant and renumbers the visible rows.
    ///
    /// The first visible row is moved to level 0. Whenever a row is more
    /// than one level deeper than the row above it, that row and its run of
    /// deeper followers are shifted up by the excess.
    pub fn consolidate_hierarchical_level(&mut self) {
        let sorted = self.visible_sorted_indices();
        let Some(&first) = sorted.first() else {
            return;
        };
        self.items[first].set_x(0);

        for i in 0..sorted.len().saturating_sub(1) {
            let current_x = self.items[sorted[i]].x();
            let next_x = self.items[sorted[i + 1]].x();
            let minimal_level = current_x + 1;

            if next_x > minimal_level {
                let dependents: Vec<usize> = sorted[i + 1..]
                    .iter()
                    .copied()
                    .take_while(|index| self.items[*index].x() >= minimal_level)
                    .collect();
                self.fix_children_position(minimal_level, next_x - minimal_level, &dependents);
            }
        }

        for (y, index) in sorted.into_iter().enumerate() {
            self.items[index].set_y(to_i32(y));
        }
    }

    /// Renumbers the visible rows in list order, leaving hidden rows hidden.
    pub fn consolidate_position_y(&mut self) {
        let mut y = 0;
        for item in self.items.iter_mut().filter(|item| item.is_visible()) {
            item.set_y(y);
            y += 1;
        }
    }

    /// Walks up from the row above `key` to the first row accepted by
    /// `predicate`.
    pub fn previous_element(
        &self,
        key: &str,
        predicate: impl Fn(&DndItem) -> bool,
    ) -> Option<&DndItem> {
        let mut y = self.item(key)?.y() - 1;
        while y > HIDDEN {
            let previous = self.item_at(y)?;
            if predicate(previous) {
                return Some(previous);
            }
            y -= 1;
        }
        None
    }

    /// The run of rows right below `key` that are nested under it.
    pub fn dependent_elements(&self, key: &str) -> Vec<&DndItem> {
        let Some(item) = self.item(key) else {
            return Vec::new();
        };
        let minimal_level = item.x() + 1;
        let mut dependents = Vec::new();
        let mut y = item.y() + 1;

        while let Some(next) = self.item_at(y) {
            if next.x() < minimal_level {
                break;
            }
            dependents.push(next);
            y += 1;
        }
        dependents
    }

    /// Starts dragging `key` and its dependents.
    ///
    /// Only a press on the row's grip starts a gesture, and only when no
    /// other gesture is in progress. Returns whether dragging started.
    pub fn start_drag(&mut self, key: &str, on_grip: bool) -> bool {
        if !on_grip || self.drag.is_some() {
            return false;
        }
        let Some(index) = self.index_of(key) else {
            return false;
        };
        if !self.items[index].is_visible() {
            return false;
        }

        let dependents: Vec<String> = self
            .dependent_elements(key)
            .into_iter()
            .map(|item| item.key().to_string())
            .collect();
        self.items[index].set_dragging(true);
        for dependent in &dependents {
            self.set_dragging(dependent, true);
        }

        debug!(key, dependents_count = dependents.len(); "Drag started");
        self.drag = Some(DragState {
            key: key.to_string(),
            dependents,
        });
        true
    }

    /// Moves the dragged rows to follow the cursor.
    pub fn drag(&mut self, mouse: MousePosition) {
        if self.drag.is_none() {
            return;
        }
        self.update_dragging_y(mouse);
        self.update_dragging_x(mouse);
        self.update_hover();
        self.update_dependents_position();
    }

    /// Ends the gesture.
    ///
    /// The dragged rows take the level under the cursor, then `on_drop`
    /// receives the list with the dragged row's key and the hovered row's
    /// key, if any. The list is consolidated afterwards. Does nothing when
    /// no gesture is in progress.
    pub fn drop<F>(&mut self, on_drop: F)
    where
        F: FnOnce(&DndList, &str, Option<&str>),
    {
        let Some(drag) = self.drag.clone() else {
            return;
        };

        self.update_dragging_elements_position(&drag);
        self.apply_hover_level(&drag);

        let hover = self.hover_key().map(str::to_string);
        debug!(key = drag.key.as_str(), hover:?; "Item dropped");
        on_drop(self, &drag.key, hover.as_deref());

        self.release();
        self.consolidate_hierarchical_level();
        self.refresh_items_position();
        self.refresh_items_html();
        self.clear_hover();
    }

    fn update_dragging_y(&mut self, mouse: MousePosition) {
        let Some(drag) = self.drag.clone() else {
            return;
        };
        let Some(dragging_y) = self.item(&drag.key).map(DndItem::y) else {
            return;
        };
        let coordinate = self.dragging_coordinate(&drag.key);
        let mouse_y = coordinate / self.config.item_height();
        let (min, max) = self.min_max(coordinate);
        let dependents_count = to_i32(drag.dependents.len());

        if dragging_y < min {
            self.swap(&drag, mouse_y, dragging_y, mouse_y + dependents_count);
        }
        if dragging_y > max {
            self.swap(&drag, mouse_y, mouse_y + dependents_count + 1, mouse_y);
        }

        let top = self.new_dragging_top(mouse);
        self.set_top(&drag.key, top);
    }

    /// Moves the row at `old_sibling_y` to `new_sibling_y` and the dragged
    /// rows to `mouse_y`.
    fn swap(&mut self, drag: &DragState, mouse_y: i32, new_sibling_y: i32, old_sibling_y: i32) {
        let Some(sibling) = self.index_at(old_sibling_y) else {
            return;
        };
        if self.items[sibling].is_dragging() {
            return;
        }
        trace!(old_sibling_y, new_sibling_y, mouse_y; "Swapping rows");

        self.items[sibling].set_y(new_sibling_y);
        self.set_position_y(&drag.key, mouse_y);
        self.clear_hover();
        for (i, dependent) in drag.dependents.iter().enumerate() {
            self.set_position_y(dependent, mouse_y + to_i32(i) + 1);
        }
        self.refresh_items_position();
    }

    fn new_dragging_top(&self, mouse: MousePosition) -> i32 {
        let top = mouse.y - self.config.item_height() / 2;
        top.clamp(0, self.area_height.max(0))
    }

    fn update_dragging_x(&mut self, mouse: MousePosition) {
        let Some(key) = self.dragging_key().map(str::to_string) else {
            return;
        };
        let max = (self.config.item_width() - self.config.indentation_size()).max(0);
        let margin = (mouse.x - self.config.grip_padding()).clamp(0, max);
        if let Some(index) = self.index_of(&key) {
            self.items[index].set_margin(margin);
        }
    }

    fn update_hover(&mut self) {
        let Some(key) = self.dragging_key().map(str::to_string) else {
            return;
        };
        let Some(dragging_y) = self.item(&key).map(DndItem::y) else {
            return;
        };
        let coordinate = self.dragging_coordinate(&key);
        let (min, max) = self.min_max(coordinate);

        if dragging_y < max || dragging_y > min {
            self.hover(coordinate / self.config.item_height());
        } else {
            self.clear_hover();
        }
    }

    fn hover(&mut self, y: i32) {
        self.clear_hover();
        if let Some(index) = self.index_at(y) {
            if !self.items[index].is_dragging() {
                self.items[index].set_hover(true);
            }
        }
    }

    fn clear_hover(&mut self) {
        for item in &mut self.items {
            item.set_hover(false);
        }
    }

    fn update_dependents_position(&mut self) {
        let Some(drag) = self.drag.clone() else {
            return;
        };
        let Some(dragging) = self.item(&drag.key).cloned() else {
            return;
        };
        let height = self.config.item_height();
        let indentation = self.config.indentation_size();

        for (i, dependent) in drag.dependents.iter().enumerate() {
            let Some(index) = self.index_of(dependent) else {
                continue;
            };
            let item = &mut self.items[index];
            let relative_level = item.x() - dragging.x();
            item.set_top(dragging.top() + height * (to_i32(i) + 1));
            item.set_margin(dragging.margin() + relative_level * indentation);
        }
    }

    /// Turns the pixel margins of the dragged rows back into levels.
    ///
    /// When the row above the drop point has children, the dragged rows
    /// go one level deeper so they join those children.
    fn update_dragging_elements_position(&mut self, drag: &DragState) {
        let Some(dragging) = self.item(&drag.key).cloned() else {
            return;
        };
        let current_x = self.current_x_position(&dragging);
        let has_children = self
            .item_at(dragging.y() - 1)
            .is_some_and(|previous| self.has_children(previous));
        let increment = i32::from(has_children);

        self.set_position_x(&drag.key, current_x + increment);
        for dependent in &drag.dependents {
            if let Some(item) = self.item(dependent) {
                let level = self.current_x_position(item) + increment;
                self.set_position_x(dependent, level);
            }
        }
    }

    /// Nests the dragged rows under the hovered row, if any.
    fn apply_hover_level(&mut self, drag: &DragState) {
        let Some(hover_x) = self.hover_key().and_then(|key| self.item(key)).map(DndItem::x) else {
            return;
        };
        let Some(dragging_x) = self.item(&drag.key).map(DndItem::x) else {
            return;
        };
        let minimal_level = hover_x + 1;
        let extra_level = dragging_x - minimal_level;

        self.set_position_x(&drag.key, minimal_level);

        let children: Vec<usize> = drag
            .dependents
            .iter()
            .chain(std::iter::once(&drag.key))
            .filter_map(|key| self.index_of(key))
            .collect();
        self.fix_children_position(minimal_level, extra_level, &children);
    }

    /// Whether the first row below `item` that is not being dragged is nested in it.
    fn has_children(&self, item: &DndItem) -> bool {
        let mut y = item.y() + 1;
        let next = loop {
            match self.item_at(y) {
                Some(next) if next.is_dragging() => y += 1,
                other => break other,
            }
        };
        next.is_some_and(|next| item.x() == next.x() - 1)
    }

    /// Shifts `children` up by `extra_level` without going above
    /// `minimal_level`. A child already at least as deep as the child
    /// before it keeps its level.
    fn fix_children_position(&mut self, minimal_level: i32, extra_level: i32, children: &[usize]) {
        for (i, &index) in children.iter().enumerate() {
            let x = self.items[index].x();
            let is_valid = i > 0 && x >= self.items[children[i - 1]].x();
            if !is_valid {
                self.items[index].set_x((x - extra_level).max(minimal_level));
            }
        }
    }

    fn release(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.set_dragging(&drag.key, false);
            for dependent in &drag.dependents {
                self.set_dragging(dependent, false);
            }
        }
    }

    fn current_x_position(&self, item: &DndItem) -> i32 {
        (item.margin() / self.config.indentation_size()).max(0)
    }

    /// Vertical centre of the dragged row.
    fn dragging_coordinate(&self, key: &str) -> i32 {
        let top = self.item(key).map(DndItem::top).unwrap_or_default();
        top + self.config.item_height() / 2
    }

    /// Row band around `coordinate` within which the dragged row stays put.
    fn min_max(&self, coordinate: i32) -> (i32, i32) {
        let height = self.config.item_height();
        let padding = self.config.drag_padding();
        ((coordinate - padding) / height, (coordinate + padding) / height)
    }

    fn visible_sorted_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.items.len())
            .filter(|index| self.items[*index].is_visible())
            .collect();
        indices.sort_by_key(|index| self.items[*index].y());
        indices
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key() == key)
    }

    fn index_at(&self, y: i32) -> Option<usize> {
        if y <= HIDDEN {
            return None;
        }
        self.items.iter().position(|item| item.y() == y)
    }

    fn set_top(&mut self, key: &str, top: i32) {
        if let Some(index) = self.index_of(key) {
            self.items[index].set_top(top);
        }
    }

    fn set_dragging(&mut self, key: &str, dragging: bool) {
        if let Some(index) = self.index_of(key) {
            self.items[index].set_dragging(dragging);
        }
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Registers `levels.len()` rows named `r0`, `r1`, ... at the given levels.
    fn list_with_levels(levels: &[i32]) -> DndList {
        let mut list = DndList::new(DndConfig::default());
        for (i, level) in levels.iter().enumerate() {
            let key = format!("r{i}");
            list.register_item(key.clone());
            list.set_position_x(&key, *level);
        }
        list.refresh_items_position();
        list
    }

    fn keys_in_order(list: &DndList) -> Vec<String> {
        let mut items: Vec<&DndItem> = list.items().iter().filter(|i| i.is_visible()).collect();
        items.sort_by_key(|item| item.y());
        items.iter().map(|item| item.key().to_string()).collect()
    }

    fn levels_in_order(list: &DndList) -> Vec<i32> {
        let mut items: Vec<&DndItem> = list.items().iter().filter(|i| i.is_visible()).collect();
        items.sort_by_key(|item| item.y());
        items.iter().map(|item| item.x()).collect()
    }

    #[test]
    fn test_register_item_appends_rows() {
        let mut list = DndList::new(DndConfig::default());

        assert_eq!(list.register_item("a").position(), Position::new(0, 0));
        assert_eq!(list.register_item("b").position(), Position::new(0, 1));
    }

    #[test]
    fn test_refresh_items_position() {
        let mut list = list_with_levels(&[0, 1]);
        list.set_position_y("r1", HIDDEN);
        list.refresh_items_position();

        let item = list.item("r0").expect("r0");
        assert_eq!((item.top(), item.margin()), (0, 0));
        assert_eq!(list.item("r1").expect("r1").margin(), 60);
        assert_eq!(list.area_height(), 71);
    }

    #[test]
    fn test_consolidate_hierarchical_level() {
        let mut list = list_with_levels(&[1, 3, 4, 1, 0]);

        list.consolidate_hierarchical_level();

        assert_eq!(levels_in_order(&list), vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_consolidate_position_y_skips_hidden_rows() {
        let mut list = list_with_levels(&[0, 1, 0]);
        list.set_position_y("r1", HIDDEN);

        list.consolidate_position_y();

        assert_eq!(list.item("r0").map(DndItem::y), Some(0));
        assert_eq!(list.item("r1").map(DndItem::y), Some(HIDDEN));
        assert_eq!(list.item("r2").map(DndItem::y), Some(1));
    }

    #[test]
    fn test_dependent_elements() {
        let list = list_with_levels(&[0, 1, 2, 1, 0]);

        let dependents: Vec<&str> = list
            .dependent_elements("r0")
            .into_iter()
            .map(DndItem::key)
            .collect();

        assert_eq!(dependents, vec!["r1", "r2", "r3"]);
        assert!(list.dependent_elements("r4").is_empty());
    }

    #[test]
    fn test_previous_element() {
        let list = list_with_levels(&[0, 1, 2, 1]);

        let previous = list.previous_element("r3", |item| item.x() <= 1);
        assert_eq!(previous.map(DndItem::key), Some("r1"));

        assert!(list.previous_element("r0", |_| true).is_none());
    }

    #[test]
    fn test_start_drag_requires_grip() {
        let mut list = list_with_levels(&[0, 1, 0]);

        assert!(!list.start_drag("r0", false));
        assert!(list.start_drag("r0", true));
        assert!(list.item("r1").expect("r1").is_dragging());
        assert!(!list.start_drag("r2", true));
    }

    #[test]
    fn test_drag_down_swaps_sibling() {
        let mut list = list_with_levels(&[0, 0, 0]);
        let mut dropped = None;

        assert!(list.start_drag("r0", true));
        list.drag(MousePosition::new(0, 110));
        list.drag(MousePosition::new(0, 110));
        list.drop(|_, current, hover| dropped = Some((current.to_string(), hover.map(str::to_string))));

        assert_eq!(keys_in_order(&list), vec!["r1", "r0", "r2"]);
        assert_eq!(dropped, Some(("r0".to_string(), None)));
        assert!(!list.is_dragging());
    }

    #[test]
    fn test_drag_moves_dependents() {
        let mut list = list_with_levels(&[0, 1, 0]);

        assert!(list.start_drag("r0", true));
        list.drag(MousePosition::new(0, 45));

        let parent = list.item("r0").expect("r0");
        let child = list.item("r1").expect("r1");
        assert_eq!(parent.top(), 10);
        assert_eq!(child.top(), 80);
        assert_eq!(child.margin(), 60);
    }

    #[test]
    fn test_drop_on_hovered_row_nests() {
        let mut list = list_with_levels(&[0, 0, 0]);
        let mut hovered = None;

        assert!(list.start_drag("r2", true));
        list.drag(MousePosition::new(10, 105));
        assert_eq!(list.hover_key(), Some("r1"));
        list.drop(|_, _, hover| hovered = hover.map(str::to_string));

        assert_eq!(hovered.as_deref(), Some("r1"));
        assert_eq!(list.item("r2").map(DndItem::x), Some(1));
        assert!(list.hover_key().is_none());
    }

    #[test]
    fn test_drag_top_is_clamped() {
        let mut list = list_with_levels(&[0, 0]);

        assert!(list.start_drag("r1", true));
        list.drag(MousePosition::new(-50, -100));

        let item = list.item("r1").expect("r1");
        assert_eq!(item.top(), 0);
        assert_eq!(item.margin(), 0);
    }

    #[test]
    fn test_zero_item_height_does_not_panic() {
        let mut list = DndList::new(DndConfig::new(0, 60, 600, 10));
        list.register_item("a");
        list.register_item("b");
        list.refresh_items_position();

        assert!(list.start_drag("a", true));
        list.drag(MousePosition::new(0, 50));
        list.drop(|_, _, _| {});

        assert!(!list.is_dragging());
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let mut list = list_with_levels(&[0]);
        let mut called = false;

        list.drop(|_, _, _| called = true);

        assert!(!called);
    }
}
