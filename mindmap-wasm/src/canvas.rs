use crate::interop::{call, describe, get, get_bool, get_f64, get_string, iter_values, new_obj, set_kv};
use mindmap::json::CanvasData;
use mindmap::model::{BBox, FocusState, NewNode};
use mindmap::{Canvas, Edge, Error, Node, NodeId, Point, Result, Selection, Side};
use serde::Serialize;
use wasm_bindgen::JsValue;

fn host_err(e: JsValue) -> Error {
    Error::Host(describe(&e))
}

fn node_from_js(v: &JsValue) -> Option<Node> {
    let id = get_string(v, "id")?;
    let node = Node::new(
        id,
        get_f64(v, "x")?,
        get_f64(v, "y")?,
        get_f64(v, "width")?,
        get_f64(v, "height")?,
    );
    Some(node.with_state(FocusState::from_flags(get_bool(v, "isFocused"), get_bool(v, "isEditing"))))
}

fn side_from_js(v: &JsValue) -> Option<Side> {
    Side::parse(&get_string(v, "side")?)
}

fn endpoint_from_js(v: &JsValue) -> Option<(NodeId, Side)> {
    let id = get_string(&get(v, "node"), "id")?;
    Some((NodeId(id), side_from_js(v)?))
}

// top/bottom endpoints are not part of the mind-map layout and are skipped
fn edge_from_js(v: &JsValue) -> Option<Edge> {
    let id = get_string(v, "id")?;
    let from = endpoint_from_js(&get(v, "from"))?;
    let to = endpoint_from_js(&get(v, "to"))?;
    Some(Edge::new(id, from, to))
}

fn to_js<T: Serialize>(v: &T) -> Result<JsValue> {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| Error::Host(e.to_string()))
}

/// [`Canvas`] over the host's live canvas object.
pub struct JsCanvas {
    canvas: JsValue,
}

impl JsCanvas {
    pub fn new(canvas: JsValue) -> JsCanvas {
        JsCanvas { canvas }
    }

    /// Host node object for `id`, looked up fresh so re-imports are picked up.
    fn js_node(&self, id: &NodeId) -> Result<JsValue> {
        let nodes = get(&self.canvas, "nodes");
        let v = call(&nodes, "get", &[&JsValue::from_str(id.as_str())]).map_err(host_err)?;
        if v.is_undefined() || v.is_null() {
            return Err(Error::UnknownNode(id.clone()));
        }
        Ok(v)
    }

    fn call_canvas(&self, method: &str, args: &[&JsValue]) -> Result<JsValue> {
        call(&self.canvas, method, args).map_err(host_err)
    }

    fn call_node(&self, id: &NodeId, method: &str, args: &[&JsValue]) -> Result<JsValue> {
        let node = self.js_node(id)?;
        call(&node, method, args).map_err(host_err)
    }
}

impl Canvas for JsCanvas {
    fn selection(&self) -> Selection {
        Selection::new(iter_values(&get(&self.canvas, "selection")).iter().filter_map(node_from_js).collect())
    }

    fn node(&self, id: &NodeId) -> Option<Node> {
        self.js_node(id).ok().as_ref().and_then(node_from_js)
    }

    fn viewport_nodes(&self) -> Vec<Node> {
        match self.call_canvas("getViewportNodes", &[]) {
            Ok(v) => iter_values(&v).iter().filter_map(node_from_js).collect(),
            Err(e) => {
                log::warn!("getViewportNodes failed: {}", e);
                Vec::new()
            }
        }
    }

    fn viewport_bbox(&self) -> BBox {
        let bbox = self
            .call_canvas("getViewportBBox", &[])
            .and_then(|v| serde_wasm_bindgen::from_value(v).map_err(|e| Error::Host(e.to_string())));
        match bbox {
            Ok(b) => b,
            Err(e) => {
                log::warn!("getViewportBBox failed: {}", e);
                BBox::default()
            }
        }
    }

    fn edges_for_node(&self, id: &NodeId) -> Vec<Edge> {
        let Ok(node) = self.js_node(id) else {
            return Vec::new();
        };
        match self.call_canvas("getEdgesForNode", &[&node]) {
            Ok(v) => iter_values(&v).iter().filter_map(edge_from_js).collect(),
            Err(e) => {
                log::warn!("getEdgesForNode({}) failed: {}", id, e);
                Vec::new()
            }
        }
    }

    fn create_text_node(&mut self, req: NewNode) -> Result<Node> {
        let v = self.call_canvas("createTextNode", &[&to_js(&req)?])?;
        node_from_js(&v).ok_or_else(|| Error::Host("createTextNode returned no node".into()))
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<()> {
        let node = self.js_node(id)?;
        self.call_canvas("removeNode", &[&node]).map(|_| ())
    }

    fn data(&self) -> Result<CanvasData> {
        let v = self.call_canvas("getData", &[])?;
        let text: String = js_sys::JSON::stringify(&v).map_err(host_err)?.into();
        serde_json::from_str(&text).map_err(Error::Data)
    }

    fn import_data(&mut self, data: CanvasData) -> Result<()> {
        let text = serde_json::to_string(&data).map_err(Error::Data)?;
        let v = js_sys::JSON::parse(&text).map_err(host_err)?;
        self.call_canvas("importData", &[&v]).map(|_| ())
    }

    fn move_node(&mut self, id: &NodeId, to: Point) -> Result<()> {
        let pos = new_obj();
        set_kv(&pos, "x", &JsValue::from_f64(to.x));
        set_kv(&pos, "y", &JsValue::from_f64(to.y));
        let pos: JsValue = pos.into();
        self.call_node(id, "moveTo", &[&pos]).map(|_| ())
    }

    fn start_editing(&mut self, id: &NodeId) -> Result<()> {
        self.call_node(id, "startEditing", &[]).map(|_| ())
    }

    fn blur(&mut self, id: &NodeId) -> Result<()> {
        self.call_node(id, "blur", &[]).map(|_| ())
    }

    fn focus(&mut self, id: &NodeId) -> Result<()> {
        self.call_node(id, "focus", &[]).map(|_| ())
    }

    fn select_only(&mut self, id: &NodeId) -> Result<()> {
        let node = self.js_node(id)?;
        self.call_canvas("selectOnly", &[&node]).map(|_| ())
    }

    fn deselect_all(&mut self) -> Result<()> {
        self.call_canvas("deselectAll", &[]).map(|_| ())
    }

    fn zoom_to_selection(&mut self) -> Result<()> {
        self.call_canvas("zoomToSelection", &[]).map(|_| ())
    }
}
