//! Depth-first traversal of tagged API items
//!
//! Tag maintenance needs to reach every API item in the project exactly
//! once, children before their containing item and an enum's values
//! before the enum itself. [`tagged_items`] is the read-only iterator;
//! the mutating passes use [`visit_code_mut`] with the same order.
//!
//! Nothing is cached: the iterator borrows the live tree, so it can be
//! restarted after any mutation.

use crate::entities::code::{CodeItem, EnumValue};
use crate::entities::facets::Code;
use crate::entities::project::{Project, SipFile};

/// A traversed API item: a content-list entry or an enum value.
#[derive(Debug, Clone, Copy)]
pub enum TaggedItemRef<'a> {
    Item(&'a CodeItem),
    EnumValue(&'a EnumValue),
}

impl<'a> TaggedItemRef<'a> {
    /// The item's tag/status facet.
    pub fn code(&self) -> &'a Code {
        match self {
            TaggedItemRef::Item(item) => item.code(),
            TaggedItemRef::EnumValue(value) => &value.code,
        }
    }
}

/// The container an item was found in.
#[derive(Debug, Clone, Copy)]
pub enum ContainerRef<'a> {
    SipFile(&'a SipFile),
    Item(&'a CodeItem),
}

enum Task<'a> {
    List {
        container: ContainerRef<'a>,
        items: &'a [CodeItem],
        index: usize,
    },
    Values {
        owner: &'a CodeItem,
        values: &'a [EnumValue],
        index: usize,
    },
    Yield {
        item: &'a CodeItem,
        container: ContainerRef<'a>,
    },
}

/// Iterator over every API item in a project.
pub struct TaggedItems<'a> {
    stack: Vec<Task<'a>>,
}

/// Iterate over all API items with their containers, depth first.
pub fn tagged_items(project: &Project) -> TaggedItems<'_> {
    let mut stack = Vec::new();

    // The stack is LIFO, so seed it in reverse document order.
    for module in project.modules.iter().rev() {
        for sip_file in module.content.iter().rev() {
            stack.push(Task::List {
                container: ContainerRef::SipFile(sip_file),
                items: &sip_file.content,
                index: 0,
            });
        }
    }

    TaggedItems { stack }
}

impl<'a> Iterator for TaggedItems<'a> {
    type Item = (TaggedItemRef<'a>, ContainerRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Task::Yield { item, container } => {
                    return Some((TaggedItemRef::Item(item), container));
                }
                Task::List {
                    container,
                    items,
                    index,
                } => {
                    let Some(item) = items.get(index) else {
                        continue;
                    };

                    self.stack.push(Task::List {
                        container,
                        items,
                        index: index + 1,
                    });
                    self.stack.push(Task::Yield { item, container });

                    // Children are visited before the item itself.
                    if let CodeItem::Enum(e) = item {
                        self.stack.push(Task::Values {
                            owner: item,
                            values: &e.content,
                            index: 0,
                        });
                    } else if let Some(content) = item.content() {
                        self.stack.push(Task::List {
                            container: ContainerRef::Item(item),
                            items: content,
                            index: 0,
                        });
                    }
                }
                Task::Values {
                    owner,
                    values,
                    index,
                } => {
                    let Some(value) = values.get(index) else {
                        continue;
                    };

                    self.stack.push(Task::Values {
                        owner,
                        values,
                        index: index + 1,
                    });
                    return Some((TaggedItemRef::EnumValue(value), ContainerRef::Item(owner)));
                }
            }
        }
    }
}

/// Apply `f` to the tag facet of every API item, in traversal order.
pub(crate) fn visit_code_mut(project: &mut Project, f: &mut impl FnMut(&mut Code)) {
    for module in &mut project.modules {
        for sip_file in &mut module.content {
            visit_items(&mut sip_file.content, f);
        }
    }
}

fn visit_items(items: &mut [CodeItem], f: &mut impl FnMut(&mut Code)) {
    for item in items.iter_mut() {
        match item {
            CodeItem::Enum(e) => {
                for value in &mut e.content {
                    f(&mut value.code);
                }
            }
            _ => {
                if let Some(content) = item.content_mut() {
                    visit_items(content, f);
                }
            }
        }
        f(item.code_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::code::{Class, Enum, EnumValue, Variable};
    use crate::entities::project::{Module, SipFile};

    fn sample_project() -> Project {
        let mut project = Project::new("t.msp");
        let mut sip_file = SipFile {
            name: "a.sip".to_string(),
            ..Default::default()
        };

        let mut class = Class {
            name: "Outer".to_string(),
            ..Default::default()
        };
        class.content.push(CodeItem::Variable(Variable {
            name: "member".to_string(),
            ..Default::default()
        }));
        class.content.push(CodeItem::Enum(Enum {
            name: "Kind".to_string(),
            content: vec![
                EnumValue {
                    name: "First".to_string(),
                    ..Default::default()
                },
                EnumValue {
                    name: "Second".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }));
        sip_file.content.push(CodeItem::Class(class));
        sip_file.content.push(CodeItem::Variable(Variable {
            name: "global".to_string(),
            ..Default::default()
        }));

        project.modules.push(Module {
            name: "m".to_string(),
            content: vec![sip_file],
            ..Default::default()
        });
        project
    }

    fn item_name(item: &TaggedItemRef<'_>) -> String {
        match item {
            TaggedItemRef::Item(CodeItem::Class(c)) => c.name.clone(),
            TaggedItemRef::Item(CodeItem::Enum(e)) => e.name.clone(),
            TaggedItemRef::Item(CodeItem::Variable(v)) => v.name.clone(),
            TaggedItemRef::EnumValue(v) => v.name.clone(),
            _ => "?".to_string(),
        }
    }

    #[test]
    fn test_children_are_visited_before_their_container() {
        let project = sample_project();
        let names: Vec<_> = tagged_items(&project)
            .map(|(item, _)| item_name(&item))
            .collect();

        // Enum values before the enum, class content before the class.
        assert_eq!(names, ["member", "First", "Second", "Kind", "Outer", "global"]);
    }

    #[test]
    fn test_enum_values_report_the_enum_as_container() {
        let project = sample_project();
        let (_, container) = tagged_items(&project)
            .find(|(item, _)| item_name(item) == "First")
            .unwrap();

        match container {
            ContainerRef::Item(CodeItem::Enum(e)) => assert_eq!(e.name, "Kind"),
            _ => panic!("enum value not contained in its enum"),
        }
    }

    #[test]
    fn test_traversal_restarts_after_mutation() {
        let mut project = sample_project();
        assert_eq!(tagged_items(&project).count(), 6);

        visit_code_mut(&mut project, &mut |code| {
            code.features.push("F".to_string());
        });

        assert_eq!(tagged_items(&project).count(), 6);
        assert!(tagged_items(&project).all(|(item, _)| item.code().features == ["F"]));
    }
}
