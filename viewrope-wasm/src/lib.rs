use wasm_bindgen::prelude::*;
use viewrope::RopeError;

/// A rope for JS. Positions are UTF-16 code units, same as JS strings.
#[wasm_bindgen]
pub struct Rope(viewrope::Rope<[u16]>);

#[wasm_bindgen]
impl Rope {
    /// Wrap a string as a rope.
    #[wasm_bindgen]
    pub fn atom(s: &str) -> Self {
        Self(viewrope::Rope::atom(s.encode_utf16().collect::<Vec<u16>>()))
    }

    #[wasm_bindgen]
    pub fn empty() -> Self {
        Self(viewrope::Rope::empty())
    }

    /// Join two ropes. Neither argument is consumed, so JS can keep using both.
    // Taking Vec<Rope> here would move the parts out of their JS handles.
    #[wasm_bindgen]
    pub fn concat(a: &Rope, b: &Rope) -> Self {
        Self(viewrope::Rope::concat([&a.0, &b.0]))
    }

    /// Join any number of ropes, in order. No parts gives the empty rope.
    #[wasm_bindgen(js_name=concatAll)]
    pub fn concat_all(parts: &RopeList) -> Self {
        Self(viewrope::Rope::concat(&parts.0))
    }

    /// A view of `rope` from `begin` to `end` (or the end of the rope). Not bounds checked here.
    #[wasm_bindgen]
    pub fn substr(rope: &Rope, begin: usize, end: Option<usize>) -> Self {
        Self(match end {
            Some(end) => rope.0.substr(begin..end),
            None => rope.0.substr(begin..),
        })
    }

    /// Render the rope, or the part from `begin` to `end`. Throws on a bad range.
    #[wasm_bindgen(js_name=toString)]
    pub fn as_string(&self, begin: Option<f64>, end: Option<f64>) -> Result<String, JsError> {
        self.render(begin, end).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.0.len()
    }
}

/// An ordered list of ropes to join with `Rope.concatAll`.
///
/// Pushing clones the handle, so the ropes pushed stay usable from JS.
#[wasm_bindgen]
#[derive(Default)]
pub struct RopeList(Vec<viewrope::Rope<[u16]>>);

#[wasm_bindgen]
impl RopeList {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rope: &Rope) {
        self.0.push(rope.0.clone());
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.0.len()
    }
}

impl Rope {
    fn render(&self, begin: Option<f64>, end: Option<f64>) -> Result<String, RopeError> {
        let units = match (begin, end) {
            (None, None) => self.0.render(),
            (begin, end) => self.0.render_numbers(
                begin.unwrap_or(0.0),
                end.unwrap_or(self.0.len() as f64),
            )?,
        };
        // Ranges can split a surrogate pair, just like String.prototype.slice.
        Ok(String::from_utf16_lossy(&units))
    }
}
