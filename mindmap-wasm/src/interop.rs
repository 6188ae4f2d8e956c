use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

pub fn get(obj: &JsValue, k: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}
pub fn get_f64(obj: &JsValue, k: &str) -> Option<f64> { get(obj, k).as_f64() }
pub fn get_bool(obj: &JsValue, k: &str) -> bool { get(obj, k).as_bool().unwrap_or(false) }
pub fn get_string(obj: &JsValue, k: &str) -> Option<String> { get(obj, k).as_string() }

/// `obj[method](...args)` with `this` bound to `obj`.
pub fn call(obj: &JsValue, method: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = get(obj, method)
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{} is not a function", method)))?;
    let arr = Array::new();
    for a in args { arr.push(a); }
    f.apply(obj, &arr)
}

/// Readable message for a thrown JS value.
pub fn describe(e: &JsValue) -> String {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

pub fn iter_values(v: &JsValue) -> Vec<JsValue> {
    match js_sys::try_iter(v) {
        Ok(Some(it)) => it.filter_map(Result::ok).collect(),
        _ => Vec::new(),
    }
}
