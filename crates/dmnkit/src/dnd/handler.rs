//! Turns a drop on the list into an edit of the data type tree.

use log::{debug, error};

use super::{
    DndError,
    data_type::{DataType, DataTypeTree},
    list::DndList,
    position::DndItem,
};

/// Where the dropped data type goes relative to its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftStrategy {
    /// First sub data type of the hovered data type.
    InsertIntoHoveredDataType,
    /// Top level, above every other data type.
    InsertTopLevelDataTypeAtTheTop,
    /// Top level, below the top-level data type above the drop point.
    InsertTopLevelDataType,
    /// Below the reference, under the same parent.
    InsertSiblingDataType,
    /// First sub data type of the reference.
    InsertNestedDataType,
}

/// What a drop looks like from the list: the dropped row, the hovered row
/// and the rows above it.
pub struct DndContext<'a> {
    list: &'a DndList,
    tree: &'a DataTypeTree,
    current: &'a str,
    hover: Option<&'a str>,
}

impl<'a> DndContext<'a> {
    pub fn new(
        list: &'a DndList,
        tree: &'a DataTypeTree,
        current: &'a str,
        hover: Option<&'a str>,
    ) -> Self {
        Self {
            list,
            tree,
            current,
            hover,
        }
    }

    pub fn current_data_type(&self) -> Option<&'a DataType> {
        self.tree.find(self.current)
    }

    fn hovered_data_type(&self) -> Option<&'a DataType> {
        self.hover.and_then(|hover| self.tree.find(hover))
    }

    /// The nearest row above the dropped one that is at its level or one
    /// level up.
    fn previous_element(&self) -> Option<&'a DndItem> {
        let current_x = self.current_x();
        self.list.previous_element(self.current, |item| {
            current_x == item.x() || current_x == item.x() + 1
        })
    }

    fn current_x(&self) -> i32 {
        self.list
            .item(self.current)
            .map(DndItem::x)
            .unwrap_or_default()
    }

    /// The data type the dropped one is placed against.
    ///
    /// That is the hovered data type, or else the data type of the previous
    /// element, or else the first top-level data type other than the
    /// dropped one.
    pub fn reference(&self) -> Option<&'a DataType> {
        if let Some(hovered) = self.hovered_data_type() {
            return Some(hovered);
        }
        if let Some(previous) = self.previous_element() {
            return self.tree.find(previous.key());
        }
        self.tree
            .data_types()
            .iter()
            .find(|data_type| data_type.uuid() != self.current)
    }

    pub fn strategy(&self) -> ShiftStrategy {
        if self.hovered_data_type().is_some() {
            return ShiftStrategy::InsertIntoHoveredDataType;
        }
        let Some(previous) = self.previous_element() else {
            return ShiftStrategy::InsertTopLevelDataTypeAtTheTop;
        };

        let current_x = self.current_x();
        if current_x == 0 {
            ShiftStrategy::InsertTopLevelDataType
        } else if current_x == previous.x() {
            ShiftStrategy::InsertSiblingDataType
        } else {
            ShiftStrategy::InsertNestedDataType
        }
    }
}

/// Moves data types within their tree in response to drops.
#[derive(Debug, Clone, Copy, Default)]
pub struct DndDataTypesHandler;

impl DndDataTypesHandler {
    pub fn new() -> Self {
        Self
    }

    /// Applies a drop of `current` to `tree`.
    ///
    /// Failures are logged and leave the tree unchanged.
    pub fn on_drop_data_type(
        &self,
        tree: &mut DataTypeTree,
        list: &DndList,
        current: &str,
        hover: Option<&str>,
    ) {
        let context = DndContext::new(list, tree, current, hover);
        let (Some(current_type), Some(reference)) =
            (context.current_data_type(), context.reference())
        else {
            debug!(current, hover:?; "Drop without a reference data type");
            return;
        };
        let strategy = context.strategy();
        let current_uuid = current_type.uuid().to_string();
        let reference_uuid = reference.uuid().to_string();

        if let Err(err) =
            self.shift_current_by_reference(tree, &current_uuid, &reference_uuid, strategy)
        {
            error!(err:%; "Drag-n-Drop error. Check 'DndDataTypesHandler'");
        }
    }

    /// Moves `current` next to, or into, `reference`.
    ///
    /// The moved data type is detached from its old place, then re-inserted
    /// with everything nested in it. Both keep their uuids, so `reference`
    /// still names the same data type once `current` is gone.
    ///
    /// # Errors
    ///
    /// Fails when either data type is missing, when `reference` is
    /// `current` or nested in it, or when a read-only data type would be
    /// edited. The tree is unchanged on failure.
    pub fn shift_current_by_reference(
        &self,
        tree: &mut DataTypeTree,
        current: &str,
        reference: &str,
        strategy: ShiftStrategy,
    ) -> Result<(), DndError> {
        let current_type = tree
            .find(current)
            .ok_or_else(|| DndError::DataTypeNotFound(current.to_string()))?;
        if current_type.is_read_only() {
            return Err(DndError::ReadOnly(current_type.name().to_string()));
        }
        if current_type.contains(reference) {
            return Err(DndError::InvalidMove {
                current: current_type.name().to_string(),
                reference: reference.to_string(),
            });
        }
        if tree.find(reference).is_none() {
            return Err(DndError::DataTypeNotFound(reference.to_string()));
        }

        let mut shifted = tree.clone();
        let moved = shifted
            .remove(current)
            .ok_or_else(|| DndError::DataTypeNotFound(current.to_string()))?;

        match strategy {
            ShiftStrategy::InsertIntoHoveredDataType | ShiftStrategy::InsertNestedDataType => {
                shifted.insert_nested(reference, moved)?;
            }
            ShiftStrategy::InsertSiblingDataType => {
                shifted.insert_below(reference, moved)?;
            }
            ShiftStrategy::InsertTopLevelDataType => {
                shifted.insert_top_level_below(reference, moved)?;
            }
            ShiftStrategy::InsertTopLevelDataTypeAtTheTop => {
                shifted.insert_at_the_top(moved);
            }
        }

        debug!(current, reference, strategy:?; "Data type shifted");
        *tree = shifted;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::DndConfig;

    fn named(name: &str) -> DataType {
        DataType::new(name, None).with_uuid(name)
    }

    /// Projects `tree` onto a list the way the data type list does.
    fn list_of(tree: &DataTypeTree) -> DndList {
        let mut list = DndList::new(DndConfig::default());
        for (data_type, level) in tree.flatten() {
            list.register_item(data_type.uuid());
            list.set_position_x(data_type.uuid(), i32::try_from(level).unwrap());
        }
        list.refresh_items_position();
        list
    }

    fn sample_tree() -> DataTypeTree {
        DataTypeTree::new(vec![
            named("tA").with_sub_data_types(vec![named("a1"), named("a2")]),
            named("tB"),
            named("tC"),
        ])
    }

    #[test]
    fn test_strategy_with_hover() {
        let tree = sample_tree();
        let list = list_of(&tree);

        let context = DndContext::new(&list, &tree, "tC", Some("tB"));

        assert_eq!(context.strategy(), ShiftStrategy::InsertIntoHoveredDataType);
        assert_eq!(context.reference().map(DataType::uuid), Some("tB"));
    }

    #[test]
    fn test_strategy_at_the_top() {
        let tree = sample_tree();
        let list = list_of(&tree);

        let context = DndContext::new(&list, &tree, "tA", None);

        assert_eq!(
            context.strategy(),
            ShiftStrategy::InsertTopLevelDataTypeAtTheTop
        );
        assert_eq!(context.reference().map(DataType::uuid), Some("tB"));
    }

    #[test]
    fn test_strategy_from_levels() {
        let tree = sample_tree();
        let mut list = list_of(&tree);

        let context = DndContext::new(&list, &tree, "tC", None);
        assert_eq!(context.strategy(), ShiftStrategy::InsertTopLevelDataType);
        assert_eq!(context.reference().map(DataType::uuid), Some("tB"));

        let context = DndContext::new(&list, &tree, "a2", None);
        assert_eq!(context.strategy(), ShiftStrategy::InsertSiblingDataType);
        assert_eq!(context.reference().map(DataType::uuid), Some("a1"));

        list.set_position_x("tC", 1);
        let context = DndContext::new(&list, &tree, "tC", None);
        assert_eq!(context.strategy(), ShiftStrategy::InsertNestedDataType);
        assert_eq!(context.reference().map(DataType::uuid), Some("tB"));
    }

    #[test]
    fn test_shift_into_hovered() {
        let mut tree = sample_tree();

        DndDataTypesHandler::new()
            .shift_current_by_reference(
                &mut tree,
                "tC",
                "tA",
                ShiftStrategy::InsertIntoHoveredDataType,
            )
            .expect("shifted");

        assert_eq!(tree.calculate_hash("tC").as_deref(), Some("tA.tC"));
        assert_eq!(tree.data_types().len(), 2);
    }

    #[test]
    fn test_shift_sibling_keeps_nested_types() {
        let mut tree = sample_tree();

        DndDataTypesHandler::new()
            .shift_current_by_reference(
                &mut tree,
                "tA",
                "tB",
                ShiftStrategy::InsertTopLevelDataType,
            )
            .expect("shifted");

        let top: Vec<&str> = tree.data_types().iter().map(DataType::name).collect();
        assert_eq!(top, vec!["tB", "tA", "tC"]);
        assert_eq!(tree.calculate_hash("a2").as_deref(), Some("tA.a2"));
    }

    #[test]
    fn test_shift_below_namesake_sibling() {
        let mut tree = DataTypeTree::new(vec![
            named("tA").with_sub_data_types(vec![
                DataType::new("code", None).with_uuid("code-1"),
                DataType::new("code", None).with_uuid("code-2"),
            ]),
            named("tB"),
        ]);

        DndDataTypesHandler::new()
            .shift_current_by_reference(
                &mut tree,
                "tB",
                "code-2",
                ShiftStrategy::InsertSiblingDataType,
            )
            .expect("shifted");

        let order: Vec<&str> = tree
            .flatten()
            .into_iter()
            .map(|(data_type, _)| data_type.uuid())
            .collect();
        assert_eq!(order, vec!["tA", "code-1", "code-2", "tB"]);
    }

    #[test]
    fn test_shift_to_missing_reference_fails() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let result = DndDataTypesHandler::new().shift_current_by_reference(
            &mut tree,
            "tC",
            "tMissing",
            ShiftStrategy::InsertNestedDataType,
        );

        assert!(matches!(result, Err(DndError::DataTypeNotFound(_))));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_shift_into_own_child_is_rejected() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let result = DndDataTypesHandler::new().shift_current_by_reference(
            &mut tree,
            "tA",
            "a1",
            ShiftStrategy::InsertNestedDataType,
        );

        assert!(matches!(result, Err(DndError::InvalidMove { .. })));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_read_only_data_type_does_not_move() {
        let mut tree = DataTypeTree::new(vec![
            named("tA"),
            named("tImported").with_read_only(true),
        ]);
        let list = list_of(&tree);
        let before = tree.clone();

        DndDataTypesHandler::new().on_drop_data_type(&mut tree, &list, "tImported", Some("tA"));

        assert_eq!(tree, before);
    }

    #[test]
    fn test_drop_without_reference_is_ignored() {
        let mut tree = DataTypeTree::new(vec![named("tA")]);
        let list = list_of(&tree);
        let before = tree.clone();

        DndDataTypesHandler::new().on_drop_data_type(&mut tree, &list, "tA", None);

        assert_eq!(tree, before);
    }
}
