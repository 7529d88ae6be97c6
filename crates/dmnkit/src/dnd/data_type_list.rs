//! The data type tree shown as a drag-and-drop list.

use std::collections::HashSet;

use log::debug;

use dmnkit_core::dmn::ItemDefinition;

use super::{
    data_type::{DataType, DataTypeTree},
    handler::DndDataTypesHandler,
    list::{DndList, MousePosition},
    position::HIDDEN,
};
use crate::config::DndConfig;

/// A [`DataTypeTree`] projected onto a [`DndList`].
///
/// Every data type is a row keyed by its uuid, at the level of its nesting
/// depth. Rows nested in a collapsed data type are hidden. The projection is
/// rebuilt from the tree after every drop.
#[derive(Debug, Clone)]
pub struct DataTypeList {
    tree: DataTypeTree,
    list: DndList,
    collapsed: HashSet<String>,
    handler: DndDataTypesHandler,
}

impl DataTypeList {
    pub fn new(tree: DataTypeTree, config: DndConfig) -> Self {
        let mut data_type_list = Self {
            tree,
            list: DndList::new(config),
            collapsed: HashSet::new(),
            handler: DndDataTypesHandler::new(),
        };
        data_type_list.refresh();
        data_type_list
    }

    pub fn from_item_definitions(definitions: &[ItemDefinition], config: DndConfig) -> Self {
        Self::new(DataTypeTree::from_item_definitions(definitions), config)
    }

    pub fn tree(&self) -> &DataTypeTree {
        &self.tree
    }

    pub fn into_tree(self) -> DataTypeTree {
        self.tree
    }

    pub fn list(&self) -> &DndList {
        &self.list
    }

    pub fn item_definitions(&self) -> Vec<ItemDefinition> {
        self.tree.to_item_definitions()
    }

    pub fn calculate_hash(&self, data_type: &DataType) -> Option<String> {
        self.tree.calculate_hash(data_type.uuid())
    }

    pub fn find_by_hash(&self, hash: &str) -> Option<&DataType> {
        self.tree.find_by_hash(hash)
    }

    /// Visible data types from top to bottom.
    pub fn visible_data_types(&self) -> Vec<&DataType> {
        let mut items: Vec<_> = self
            .list
            .items()
            .iter()
            .filter(|item| item.is_visible())
            .collect();
        items.sort_by_key(|item| item.y());
        items
            .into_iter()
            .filter_map(|item| self.tree.find(item.key()))
            .collect()
    }

    pub fn is_collapsed(&self, uuid: &str) -> bool {
        self.collapsed.contains(uuid)
    }

    /// Hides the data types nested in `uuid`.
    pub fn collapse(&mut self, uuid: &str) {
        if self.tree.find(uuid).is_some_and(DataType::has_sub_data_types) {
            self.collapsed.insert(uuid.to_string());
            self.refresh();
        }
    }

    pub fn expand(&mut self, uuid: &str) {
        if self.collapsed.remove(uuid) {
            self.refresh();
        }
    }

    /// A press on a row. Returns whether a drag started.
    pub fn on_mouse_down(&mut self, uuid: &str, on_grip: bool) -> bool {
        self.list.start_drag(uuid, on_grip)
    }

    pub fn on_mouse_move(&mut self, mouse: MousePosition) {
        self.list.drag(mouse);
    }

    /// Drops the dragged data type and rebuilds the list from the tree.
    pub fn on_mouse_up(&mut self) {
        if !self.list.is_dragging() {
            return;
        }
        let tree = &mut self.tree;
        let handler = &self.handler;
        self.list.drop(|list, current, hover| {
            handler.on_drop_data_type(tree, list, current, hover);
        });
        self.refresh();
    }

    /// Leaving the drag area drops like a release does.
    pub fn on_mouse_out(&mut self) {
        self.on_mouse_up();
    }

    /// Rebuilds the rows from the tree.
    pub fn refresh(&mut self) {
        fn register(
            list: &mut DndList,
            collapsed: &HashSet<String>,
            data_types: &[DataType],
            level: i32,
            hidden: bool,
        ) {
            for data_type in data_types {
                list.register_item(data_type.uuid());
                list.set_position_x(data_type.uuid(), level);
                if hidden {
                    list.set_position_y(data_type.uuid(), HIDDEN);
                }
                let hides_children = hidden || collapsed.contains(data_type.uuid());
                register(
                    list,
                    collapsed,
                    data_type.sub_data_types(),
                    level + 1,
                    hides_children,
                );
            }
        }

        self.collapsed.retain(|uuid| self.tree.find(uuid).is_some());
        self.list.clear();
        register(
            &mut self.list,
            &self.collapsed,
            self.tree.data_types(),
            0,
            false,
        );
        self.list.consolidate_position_y();
        self.list.refresh_items_position_and_html();

        debug!(
            rows_count = self.list.items().len(),
            collapsed_count = self.collapsed.len();
            "Data type list refreshed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dnd::position::DndItem;

    fn named(name: &str) -> DataType {
        DataType::new(name, Some("string".to_string())).with_uuid(name)
    }

    fn names(list: &DataTypeList) -> Vec<&str> {
        list.visible_data_types()
            .into_iter()
            .map(DataType::name)
            .collect()
    }

    #[test]
    fn test_rows_follow_nesting() {
        let tree = DataTypeTree::new(vec![
            named("tPerson").with_sub_data_types(vec![named("name")]),
            named("tCity"),
        ]);

        let list = DataTypeList::new(tree, DndConfig::default());

        let levels: Vec<i32> = ["tPerson", "name", "tCity"]
            .iter()
            .filter_map(|uuid| list.list().item(uuid).map(DndItem::x))
            .collect();
        assert_eq!(levels, vec![0, 1, 0]);
        assert_eq!(names(&list), vec!["tPerson", "name", "tCity"]);
    }

    #[test]
    fn test_collapse_hides_nested_rows() {
        let tree = DataTypeTree::new(vec![
            named("tPerson").with_sub_data_types(vec![
                named("address").with_sub_data_types(vec![named("street")]),
            ]),
            named("tCity"),
        ]);
        let mut list = DataTypeList::new(tree, DndConfig::default());

        list.collapse("tPerson");

        assert!(list.is_collapsed("tPerson"));
        assert_eq!(names(&list), vec!["tPerson", "tCity"]);
        assert_eq!(list.list().item("tCity").map(DndItem::y), Some(1));
        assert_eq!(list.list().area_height(), 141);

        list.expand("tPerson");
        assert_eq!(names(&list), vec!["tPerson", "address", "street", "tCity"]);
    }

    #[test]
    fn test_collapse_ignores_leaf_types() {
        let tree = DataTypeTree::new(vec![named("tCity")]);
        let mut list = DataTypeList::new(tree, DndConfig::default());

        list.collapse("tCity");

        assert!(!list.is_collapsed("tCity"));
    }

    #[test]
    fn test_drop_onto_hovered_data_type_nests_it() {
        let tree = DataTypeTree::new(vec![named("A"), named("Parent"), named("B")]);
        let mut list = DataTypeList::new(tree, DndConfig::default());

        assert!(list.on_mouse_down("B", true));
        list.on_mouse_move(MousePosition::new(10, 105));
        list.on_mouse_up();

        let tree = list.tree();
        assert_eq!(tree.parent_uuid("B"), Some("Parent"));
        let top: Vec<&str> = tree.data_types().iter().map(DataType::name).collect();
        assert_eq!(top, vec!["A", "Parent"]);
        assert_eq!(list.list().item("B").map(DndItem::x), Some(1));
        assert!(!list.list().is_dragging());
    }

    #[test]
    fn test_drop_below_sibling_reorders() {
        let tree = DataTypeTree::new(vec![named("A"), named("B"), named("C")]);
        let mut list = DataTypeList::new(tree, DndConfig::default());

        assert!(list.on_mouse_down("A", true));
        list.on_mouse_move(MousePosition::new(0, 110));
        list.on_mouse_move(MousePosition::new(0, 110));
        list.on_mouse_out();

        assert_eq!(names(&list), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_press_outside_grip_does_not_drag() {
        let tree = DataTypeTree::new(vec![named("A"), named("B")]);
        let mut list = DataTypeList::new(tree.clone(), DndConfig::default());

        assert!(!list.on_mouse_down("B", false));
        list.on_mouse_move(MousePosition::new(0, 0));
        list.on_mouse_up();

        assert_eq!(list.tree(), &tree);
    }
}
