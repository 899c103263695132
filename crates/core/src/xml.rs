//! Node helpers shared by the descriptor readers.

use roxmltree::Node;

use crate::model::ConfigElement;

pub(crate) fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

pub(crate) fn child_element<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

pub(crate) fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name).and_then(element_text)
}

pub(crate) fn element_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Convert a free-form XML subtree into an owned configuration document.
pub(crate) fn convert_config(node: Node<'_, '_>) -> ConfigElement {
    let mut element = ConfigElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        element.set_attribute(attribute.name(), attribute.value());
    }
    for child in node.children().filter(|c| c.is_element()) {
        element.add_child(convert_config(child));
    }
    if element.children.is_empty() {
        element.value = element_text(node);
    }
    element
}
