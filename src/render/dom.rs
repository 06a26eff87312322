//! Browser implementation of the presentation side.
//!
//! `DomBinding` resolves the container's elements once, by `data-index` (or
//! by position on first bind), into a typed index -> element table. `DomSurface` writes frames into it and
//! `RafScheduler` drives frames with `requestAnimationFrame`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Window};

use super::{FrameScheduler, SceneSurface};
use crate::error::{BindingError, SphereError};
use crate::sphere::compositor::Frame;

/// CSS selectors used to find the sphere's parts inside the container.
#[derive(Debug, Clone)]
pub struct DomSelectors {
    pub node: String,
    pub label: String,
    /// Parent whose child order is the paint order.
    pub depth_group: String,
    /// Parent of the edge elements, one child per edge, in edge order.
    pub edge_group: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            node: ".sphere-node".to_string(),
            label: ".sphere-label".to_string(),
            depth_group: ".sphere-nodes".to_string(),
            edge_group: ".sphere-edges".to_string(),
        }
    }
}

pub fn check_count(what: &'static str, expected: usize, found: usize) -> Result<(), BindingError> {
    if expected == found {
        Ok(())
    } else {
        Err(BindingError::CountMismatch { what, expected, found })
    }
}

/// Labels are optional as a whole but must match the nodes when present.
pub fn check_label_count(nodes: usize, labels: usize) -> Result<(), BindingError> {
    if labels == 0 {
        return Ok(());
    }
    check_count("label", nodes, labels)
}

/// Map each index to the position of its element in document order.
///
/// `ids` holds each element's `data-index`, in document order. Elements that
/// all carry one are matched by it, since painting reorders them; elements
/// with none are matched by position.
pub fn order_by_index(what: &'static str, ids: &[Option<String>]) -> Result<Vec<usize>, BindingError> {
    let count = ids.len();
    if ids.iter().all(Option::is_none) {
        return Ok((0..count).collect());
    }

    let mut order: Vec<Option<usize>> = vec![None; count];
    for (pos, id) in ids.iter().enumerate() {
        let Some(value) = id else {
            return Err(BindingError::PartialIndex { what });
        };
        let index = value
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&i| i < count)
            .ok_or_else(|| BindingError::BadIndex { what, value: value.clone(), count })?;
        if order[index].replace(pos).is_some() {
            return Err(BindingError::DuplicateIndex { what, index });
        }
    }
    // `count` distinct values below `count` fill every slot.
    Ok(order.into_iter().flatten().collect())
}

fn bind_by_index(what: &'static str, elements: Vec<HtmlElement>) -> Result<Vec<HtmlElement>, BindingError> {
    let ids: Vec<Option<String>> = elements.iter().map(|el| el.get_attribute("data-index")).collect();
    let order = order_by_index(what, &ids)?;
    let mut slots: Vec<Option<HtmlElement>> = elements.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|pos| slots[pos].take()).collect())
}

fn host_err(e: JsValue) -> BindingError {
    BindingError::Host(format!("{:?}", e))
}

fn query_all<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>, BindingError> {
    let list = root.query_selector_all(selector).map_err(host_err)?;
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|node| {
            node.dyn_into::<T>()
                .map_err(|_| BindingError::Host(format!("`{}` matched an unexpected element type", selector)))
        })
        .collect()
}

fn query_one(root: &Element, selector: &str) -> Result<Element, BindingError> {
    root.query_selector(selector)
        .map_err(host_err)?
        .ok_or_else(|| BindingError::Missing(selector.to_string()))
}

/// Element table for one container, indexed by node index and edge slot.
#[derive(Debug, Clone)]
pub struct DomBinding {
    depth_group: Element,
    nodes: Vec<HtmlElement>,
    labels: Vec<HtmlElement>,
    edges: Vec<Element>,
}

impl DomBinding {
    pub fn resolve(
        container: &Element,
        selectors: &DomSelectors,
        node_count: usize,
        edge_count: usize,
    ) -> Result<Self, BindingError> {
        let depth_group = query_one(container, &selectors.depth_group)?;
        let edge_group = query_one(container, &selectors.edge_group)?;

        let nodes: Vec<HtmlElement> = query_all(container, &selectors.node)?;
        check_count("node", node_count, nodes.len())?;
        let nodes = bind_by_index("node", nodes)?;

        let labels: Vec<HtmlElement> = query_all(container, &selectors.label)?;
        check_label_count(node_count, labels.len())?;
        let labels = bind_by_index("label", labels)?;

        let children = edge_group.children();
        let edges: Vec<Element> = (0..children.length()).filter_map(|i| children.item(i)).collect();
        check_count("edge", edge_count, edges.len())?;

        // Exposes the index to the detail panel's click handler and keeps a
        // later rebind of this container correct after painting reorders it.
        for (i, el) in nodes.iter().enumerate().chain(labels.iter().enumerate()) {
            el.set_attribute("data-index", &i.to_string()).map_err(host_err)?;
        }

        log::debug!(
            "bound sphere: {} nodes, {} labels, {} edges",
            nodes.len(),
            labels.len(),
            edges.len()
        );

        Ok(Self { depth_group, nodes, labels, edges })
    }
}

pub struct DomSurface {
    binding: DomBinding,
}

impl DomSurface {
    pub fn new(binding: DomBinding) -> Self {
        Self { binding }
    }

    fn place(el: &HtmlElement, props: &[(&str, String)]) {
        let style = el.style();
        for (name, value) in props {
            // Writes to a detached element are harmless; nothing to recover.
            let _ = style.set_property(name, value);
        }
    }
}

impl SceneSurface for DomSurface {
    fn apply(&mut self, frame: &Frame) {
        let b = &self.binding;

        for p in &frame.nodes {
            let Some(node) = b.nodes.get(p.index) else { continue };
            Self::place(node, &[
                ("left", format!("{:.2}px", p.screen_x)),
                ("top", format!("{:.2}px", p.screen_y)),
                ("transform", format!("translate(-50%, -50%) scale({:.4})", p.scale)),
                ("opacity", format!("{:.3}", p.opacity())),
            ]);
            let _ = b.depth_group.append_child(node);

            if let Some(label) = b.labels.get(p.index) {
                Self::place(label, &[
                    ("left", format!("{:.2}px", p.screen_x)),
                    ("top", format!("{:.2}px", p.label_y())),
                    ("opacity", format!("{:.3}", p.label_opacity())),
                ]);
                let _ = b.depth_group.append_child(label);
            }
        }

        for seg in &frame.edges {
            let Some(line) = b.edges.get(seg.slot) else { continue };
            let _ = line.set_attribute("x1", &format!("{:.2}", seg.x1));
            let _ = line.set_attribute("y1", &format!("{:.2}", seg.y1));
            let _ = line.set_attribute("x2", &format!("{:.2}", seg.x2));
            let _ = line.set_attribute("y2", &format!("{:.2}", seg.y2));
            let _ = line.set_attribute("stroke-opacity", &format!("{:.3}", seg.opacity));
        }
    }
}

/// `requestAnimationFrame` scheduler. The callback is installed after the
/// loop it drives exists, see `wasm::SphereHandle::start`.
pub struct RafScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self { window, callback: None }
    }

    pub fn set_callback(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for RafScheduler {
    type Token = i32;

    fn request_frame(&mut self) -> Result<i32, SphereError> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| SphereError::Schedule("frame callback not installed".to_string()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| SphereError::Schedule(format!("{:?}", e)))
    }

    fn cancel_frame(&mut self, token: i32) {
        let _ = self.window.cancel_animation_frame(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch() {
        assert_eq!(check_count("node", 7, 7), Ok(()));
        assert_eq!(
            check_count("edge", 4, 3),
            Err(BindingError::CountMismatch { what: "edge", expected: 4, found: 3 })
        );
    }

    #[test]
    fn test_labels_optional() {
        assert!(check_label_count(7, 0).is_ok());
        assert!(check_label_count(7, 7).is_ok());
        assert!(check_label_count(7, 6).is_err());
    }

    fn ids(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_unmarked_elements_bind_by_position() {
        assert_eq!(order_by_index("node", &[None, None, None]), Ok(vec![0, 1, 2]));
    }

    #[test]
    fn test_painted_order_binds_by_index() {
        // Document order after a frame painted nodes back-to-front.
        let painted = ids(&["1", "0", "3", "4", "2", "6", "5"]);
        let order = order_by_index("node", &painted).unwrap();
        // Index i is bound to the element whose data-index is i.
        assert_eq!(order, vec![1, 0, 4, 2, 3, 6, 5]);
        for (index, &pos) in order.iter().enumerate() {
            assert_eq!(painted[pos].as_deref(), Some(index.to_string().as_str()));
        }
    }

    #[test]
    fn test_bad_indices_rejected() {
        assert_eq!(
            order_by_index("node", &ids(&["0", "0", "1"])),
            Err(BindingError::DuplicateIndex { what: "node", index: 0 })
        );
        assert!(matches!(
            order_by_index("node", &ids(&["0", "3", "1"])),
            Err(BindingError::BadIndex { value, count: 3, .. }) if value == "3"
        ));
        assert!(matches!(
            order_by_index("label", &ids(&["0", "x"])),
            Err(BindingError::BadIndex { .. })
        ));
        assert_eq!(
            order_by_index("node", &[Some("1".to_string()), None]),
            Err(BindingError::PartialIndex { what: "node" })
        );
    }

    #[test]
    fn test_default_selectors() {
        let s = DomSelectors::default();
        assert_eq!(s.node, ".sphere-node");
        assert_eq!(s.depth_group, ".sphere-nodes");
    }
}
