use std::collections::{HashMap, HashSet};

use crate::selector::{
    SelectorCombinator, SelectorPart, SelectorPseudoClass, SelectorStep, parse_selector_groups,
};
use crate::{Error, Result};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

/// Handle to a node of a [`Page`](crate::Page) document.
///
/// Handles stay valid for the lifetime of the page; nodes are never freed,
/// only detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: Attributes,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
    pub(crate) required: bool,
}

/// Attribute list in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        if let Some(slot) = self.0.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(key, _)| key == name)?;
        Some(self.0.remove(pos).1)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: Attributes,
    ) -> NodeId {
        let element = Element {
            value: attrs.get("value").unwrap_or_default().to_string(),
            checked: attrs.contains_key("checked"),
            disabled: attrs.contains_key("disabled"),
            readonly: attrs.contains_key("readonly"),
            required: attrs.contains_key("required"),
            tag_name,
            attrs,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id"))
            .filter(|id_attr| !id_attr.is_empty())
            .map(str::to_string)
        {
            // First element with a given id wins, as with getElementById.
            self.id_index.entry(id_attr).or_insert(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn is_valid_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn require_element(&self, node_id: NodeId, op: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::Dom(format!("{op} target is not an element")))
    }

    fn require_element_mut(&mut self, node_id: NodeId, op: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::Dom(format!("{op} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|node| node.parent)
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node_id, &mut out);
        out
    }

    fn collect_text(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let Some(node) = self.nodes.get(node_id.0) else {
                return;
            };
            match &node.node_type {
                NodeType::Document | NodeType::Element(_) => {
                    for child in &node.children {
                        self.collect_text(*child, out);
                    }
                }
                NodeType::Text(text) => out.push_str(text),
            }
        })
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.require_element(node_id, "textContent")?;
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        self.rebuild_id_index();
        if self.is_tag(node_id, "select") {
            return self.sync_select_value(node_id);
        }
        self.sync_select_value_for_option(node_id)
    }

    /// Checkboxes and radios without a `value` attribute read `"on"`.
    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self.require_element(node_id, "value")?;
        if is_checkable_input(element) && !element.attrs.contains_key("value") {
            return Ok("on".into());
        }
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.is_tag(node_id, "select") {
            return self.set_select_value(node_id, value);
        }
        let element = self.require_element_mut(node_id, "value")?;
        if is_checkable_input(element) {
            element.attrs.insert("value".into(), value.to_string());
        }
        element.value = value.to_string();
        Ok(())
    }

    /// Loads `<textarea>` values from their markup text and `<select>` values
    /// from their selected option.
    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            if self.is_tag(node, "textarea") {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            } else if self.is_tag(node, "select") {
                self.sync_select_value(node)?;
            }
        }
        Ok(())
    }

    fn sync_select_value_for_option(&mut self, option_node: NodeId) -> Result<()> {
        if !self.is_tag(option_node, "option") {
            return Ok(());
        }
        let Some(select_node) = self.find_ancestor_by_tag(option_node, "select") else {
            return Ok(());
        };
        self.sync_select_value(select_node)
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let mut matched = None;
        for option in self.select_options(select_node) {
            let value = self.option_effective_value(option)?;
            if matched.is_none() && value == requested {
                matched = Some((option, value));
            }
        }

        for option in self.select_options(select_node) {
            let element = self.require_element_mut(option, "option")?;
            if matched.as_ref().is_some_and(|(node, _)| *node == option) {
                element.attrs.insert("selected".into(), String::new());
            } else {
                element.attrs.remove("selected");
            }
        }

        self.require_element_mut(select_node, "select")?.value =
            matched.map(|(_, value)| value).unwrap_or_default();
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let value = self.select_value_from_options(select_node)?;
        self.require_element_mut(select_node, "select")?.value = value;
        Ok(())
    }

    /// The first `selected` option wins; without one, the first option.
    fn select_value_from_options(&self, select_node: NodeId) -> Result<String> {
        let options = self.select_options(select_node);
        let selected = options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied());
        match selected {
            Some(option) => self.option_effective_value(option),
            None => Ok(String::new()),
        }
    }

    fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_select_options(select_node, &mut out);
        out
    }

    fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(children) = self.nodes.get(node.0).map(|node| &node.children) else {
            return;
        };
        for child in children {
            if self.is_tag(*child, "option") {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    fn option_effective_value(&self, option_node: NodeId) -> Result<String> {
        let element = self.require_element(option_node, "option")?;
        if let Some(value) = element.attrs.get("value") {
            return Ok(value.to_string());
        }
        Ok(self.text_content(option_node).trim().to_string())
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.require_element(node_id, "checked")?.checked)
    }

    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        self.require_element_mut(node_id, "checked")?.checked = checked;
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.disabled)
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.readonly)
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).map(str::to_string))
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> Result<bool> {
        Ok(self
            .require_element(node_id, "hasAttribute")?
            .attrs
            .contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self.require_element_mut(node_id, "setAttribute")?;
        element.attrs.insert(lowered.clone(), value.to_string());
        match lowered.as_str() {
            "value" => element.value = value.to_string(),
            "checked" => element.checked = true,
            "disabled" => element.disabled = true,
            "readonly" => element.readonly = true,
            "required" => element.required = true,
            "id" => self.rebuild_id_index(),
            _ => {}
        }
        if matches!(lowered.as_str(), "selected" | "value") {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self.require_element_mut(node_id, "removeAttribute")?;
        element.attrs.remove(&lowered);
        match lowered.as_str() {
            "checked" => element.checked = false,
            "disabled" => element.disabled = false,
            "readonly" => element.readonly = false,
            "required" => element.required = false,
            "id" => self.rebuild_id_index(),
            _ => {}
        }
        if matches!(lowered.as_str(), "selected" | "value") {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    /// Reads `element.dataset[key]`; an absent attribute reads as `None`.
    pub(crate) fn dataset_get(&self, node_id: NodeId, key: &str) -> Result<Option<String>> {
        self.require_element(node_id, "dataset")?;
        Ok(self.attr(node_id, &dataset_key_to_attr_name(key)))
    }

    pub(crate) fn class_list(&self, node_id: NodeId) -> Result<Vec<String>> {
        let element = self.require_element(node_id, "classList")?;
        Ok(class_tokens(element.attrs.get("class")))
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        Ok(has_class(
            self.require_element(node_id, "classList")?,
            class_name,
        ))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.require_element_mut(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class"));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.require_element_mut(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class"));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name)? {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self
                    .by_id(id)
                    .filter(|node| self.is_connected(*node))
                    .into_iter()
                    .collect());
            }
        }

        let candidates = self.all_element_nodes();
        Ok(self.filter_matches(candidates, &groups))
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut candidates = Vec::new();
        if let Some(node) = self.nodes.get(root.0) {
            for child in &node.children {
                self.collect_elements_dfs(*child, &mut candidates);
            }
        }
        Ok(self.filter_matches(candidates, &groups))
    }

    fn filter_matches(&self, candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| {
                groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(*candidate, steps))
                    && seen.insert(*candidate)
            })
            .collect()
    }

    pub(crate) fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        if self.element(node_id).is_none() {
            return Ok(false);
        }
        let groups = parse_selector_groups(selector)?;
        Ok(groups
            .iter()
            .any(|steps| self.matches_selector_chain(node_id, steps)))
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        for node in self.all_element_nodes() {
            if let Some(id) = self.element(node).and_then(|e| e.attrs.get("id")) {
                if !id.is_empty() {
                    next.entry(id.to_string()).or_insert(node);
                }
            }
        }
        self.id_index = next;
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let Some(node) = self.nodes.get(node_id.0) else {
                return;
            };
            if matches!(node.node_type, NodeType::Element(_)) {
                out.push(node_id);
            }
            for child in &node.children {
                self.collect_elements_dfs(*child, out);
            }
        })
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        self.matches_step(node_id, &last.step) && self.matches_chain_prefix(node_id, last, rest)
    }

    /// Matches `prefix` against the elements reachable from `node_id` through
    /// `part`'s combinator, trying every candidate before giving up.
    fn matches_chain_prefix(
        &self,
        node_id: NodeId,
        part: &SelectorPart,
        prefix: &[SelectorPart],
    ) -> bool {
        if prefix.is_empty() {
            return true;
        }
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let combinator = part.combinator.unwrap_or(SelectorCombinator::Descendant);
            let step_matches = |candidate: NodeId| self.matches_selector_chain(candidate, prefix);
            match combinator {
                SelectorCombinator::Child => self.parent(node_id).is_some_and(step_matches),
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(node_id);
                    while let Some(ancestor) = cursor {
                        if step_matches(ancestor) {
                            return true;
                        }
                        cursor = self.parent(ancestor);
                    }
                    false
                }
                SelectorCombinator::AdjacentSibling => self
                    .previous_element_sibling(node_id)
                    .is_some_and(step_matches),
                SelectorCombinator::GeneralSibling => {
                    let mut cursor = self.previous_element_sibling(node_id);
                    while let Some(sibling) = cursor {
                        if step_matches(sibling) {
                            return true;
                        }
                        cursor = self.previous_element_sibling(sibling);
                    }
                    false
                }
            }
        })
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id.as_str()) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        if step
            .attrs
            .iter()
            .any(|cond| !cond.matches(element.attrs.get(cond.key())))
        {
            return false;
        }

        step.pseudo_classes.iter().all(|pseudo| match pseudo {
            SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
            SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
            SelectorPseudoClass::Checked => element.checked,
            SelectorPseudoClass::Disabled => element.disabled,
            SelectorPseudoClass::Enabled => !element.disabled,
            SelectorPseudoClass::Required => element.required,
            SelectorPseudoClass::Optional => !element.required,
            SelectorPseudoClass::Not(inners) => !inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
        })
    }

    fn element_siblings(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node_id) else {
            return Vec::new();
        };
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let siblings = self.element_siblings(node_id);
        let pos = siblings.iter().position(|sibling| *sibling == node_id)?;
        pos.checked_sub(1).map(|prev| siblings[prev])
    }

    fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let siblings = self.element_siblings(node_id);
        let pos = siblings.iter().position(|sibling| *sibling == node_id)?;
        siblings.get(pos + 1).copied()
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self.is_tag(current, tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(node_id, &mut out);
        out
    }

    fn dump_into(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let Some(node) = self.nodes.get(node_id.0) else {
                return;
            };
            match &node.node_type {
                NodeType::Document => {
                    for child in &node.children {
                        self.dump_into(*child, out);
                    }
                }
                NodeType::Text(text) => out.push_str(text),
                NodeType::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag_name);
                    for (k, v) in element.attrs.iter() {
                        out.push(' ');
                        out.push_str(k);
                        out.push_str("=\"");
                        out.push_str(v);
                        out.push('"');
                    }
                    out.push('>');
                    if crate::html::is_void_tag(&element.tag_name) {
                        return;
                    }
                    for child in &node.children {
                        self.dump_into(*child, out);
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                }
            }
        })
    }
}

fn is_checkable_input(element: &Element) -> bool {
    element.tag_name.eq_ignore_ascii_case("input")
        && element.attrs.get("type").is_some_and(|kind| {
            kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio")
        })
}

fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

/// `targetId` -> `data-target-id`.
pub(crate) fn dataset_key_to_attr_name(key: &str) -> String {
    let mut out = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out: String = it.by_ref().take(max_chars).collect();
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
