//! Content stream interpreter.
//!
//! Walks the operators of a decoded content stream, maintaining the CTM and
//! text state, and emits a [`CharEvent`] per shown glyph to a
//! [`ContentHandler`]. Form XObjects are followed through the `Do` operator.

use std::collections::HashMap;

use formstamp_core::Ctm;
use lopdf::Object;
use lopdf::content::{Content, Operation};

use crate::cmap::ToUnicodeCMap;
use crate::encoding::SimpleEncoding;
use crate::error::BackendError;
use crate::font_metrics::{
    FontMetrics, base_font_name, extract_font_metrics, is_type0_font, object_to_f64_opt,
    resolve_object,
};
use crate::handler::{CharEvent, ContentHandler};
use crate::text_renderer::{
    CodeWidth, RawChar, TjElement, show_string, show_string_with_positioning,
};
use crate::text_state::TextState;

/// Maximum nesting of Form XObjects followed by `Do`.
pub const MAX_FORM_DEPTH: usize = 8;

/// A font resolved from a page's `/Resources/Font` dictionary.
#[derive(Debug, Clone)]
struct LoadedFont {
    base_name: String,
    metrics: FontMetrics,
    encoding: SimpleEncoding,
    to_unicode: Option<ToUnicodeCMap>,
    code_width: CodeWidth,
}

impl LoadedFont {
    /// Stand-in for a font missing from the resources.
    fn fallback(resource_name: &str) -> Self {
        let metrics = crate::standard_fonts::lookup(resource_name).map_or_else(
            FontMetrics::default_metrics,
            |data| {
                let widths = data
                    .widths
                    .iter()
                    .enumerate()
                    .map(|(code, &w)| (code as u32, f64::from(w)))
                    .collect();
                FontMetrics::new(widths, 600.0, 750.0, -250.0)
            },
        );
        Self {
            base_name: resource_name.to_string(),
            metrics,
            encoding: SimpleEncoding::win_ansi(),
            to_unicode: None,
            code_width: CodeWidth::Single,
        }
    }

    fn unicode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|cmap| cmap.lookup(code)) {
            return Some(text.to_string());
        }
        match self.code_width {
            CodeWidth::Single => u8::try_from(code)
                .ok()
                .and_then(|byte| self.encoding.decode(byte))
                .map(String::from),
            CodeWidth::Double => None,
        }
    }
}

/// Graphics state carried across operators and into Form XObjects.
#[derive(Debug, Clone)]
pub struct InterpreterState {
    ctm: Ctm,
    text: TextState,
    stack: Vec<(Ctm, TextState)>,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterState {
    pub fn new() -> Self {
        Self {
            ctm: Ctm::identity(),
            text: TextState::new(),
            stack: Vec::new(),
        }
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    pub fn text(&self) -> &TextState {
        &self.text
    }

    fn save(&mut self) {
        self.stack.push((self.ctm, self.text.save_snapshot()));
    }

    fn restore(&mut self) {
        if let Some((ctm, text)) = self.stack.pop() {
            self.ctm = ctm;
            self.text.restore_snapshot(text);
        }
    }

    /// `cm`: pre-multiply the CTM.
    fn concat(&mut self, m: Ctm) {
        self.ctm = m.concat(&self.ctm);
    }
}

/// Interpret one content stream against `resources`.
///
/// `depth` is 0 for page content and grows by one per Form XObject.
pub fn interpret_content_stream(
    doc: &lopdf::Document,
    stream_bytes: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    state: &mut InterpreterState,
) -> Result<(), BackendError> {
    if depth > MAX_FORM_DEPTH {
        return Err(BackendError::Interpreter(format!(
            "Form XObject recursion depth {depth} exceeds limit {MAX_FORM_DEPTH}"
        )));
    }

    let content = Content::decode(stream_bytes)
        .map_err(|e| BackendError::Interpreter(format!("content stream decode failed: {e}")))?;
    let mut fonts: HashMap<String, LoadedFont> = HashMap::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => state.save(),
            "Q" => state.restore(),
            "cm" => {
                if let Some(m) = matrix_operand(&op.operands) {
                    state.concat(m);
                }
            }

            "BT" => state.text.begin_text(),
            "ET" => {}
            "Tf" => {
                if let (Some(name), Some(size)) = (name_at(op, 0), number_at(op, 1)) {
                    if !fonts.contains_key(&name) {
                        let font = load_font(doc, resources, &name);
                        fonts.insert(name.clone(), font);
                    }
                    state.text.font_name = name;
                    state.text.font_size = size;
                }
            }
            "Tc" => set_number(op, &mut state.text.char_spacing),
            "Tw" => set_number(op, &mut state.text.word_spacing),
            "Tz" => set_number(op, &mut state.text.h_scaling),
            "TL" => set_number(op, &mut state.text.leading),
            "Ts" => set_number(op, &mut state.text.rise),
            "Tm" => {
                if let Some(m) = matrix_operand(&op.operands) {
                    state.text.set_text_matrix(m);
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (number_at(op, 0), number_at(op, 1)) {
                    state.text.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number_at(op, 0), number_at(op, 1)) {
                    state.text.move_text_position_and_set_leading(tx, ty);
                }
            }
            "T*" => state.text.move_to_next_line(),

            "Tj" => {
                if let Some(bytes) = op.operands.first().and_then(string_bytes) {
                    show_text(state, &fonts, handler, |ts, width, get_width| {
                        show_string(ts, bytes, width, get_width)
                    });
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let elements: Vec<TjElement> = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(TjElement::String(bytes.clone())),
                            other => object_to_f64_opt(other).map(TjElement::Adjustment),
                        })
                        .collect();
                    show_text(state, &fonts, handler, |ts, width, get_width| {
                        show_string_with_positioning(ts, &elements, width, get_width)
                    });
                }
            }
            "'" => {
                state.text.move_to_next_line();
                if let Some(bytes) = op.operands.first().and_then(string_bytes) {
                    show_text(state, &fonts, handler, |ts, width, get_width| {
                        show_string(ts, bytes, width, get_width)
                    });
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (number_at(op, 0), number_at(op, 1)) {
                    state.text.word_spacing = aw;
                    state.text.char_spacing = ac;
                }
                state.text.move_to_next_line();
                if let Some(bytes) = op.operands.get(2).and_then(string_bytes) {
                    show_text(state, &fonts, handler, |ts, width, get_width| {
                        show_string(ts, bytes, width, get_width)
                    });
                }
            }

            "Do" => {
                if let Some(name) = name_at(op, 0) {
                    handle_do(doc, resources, handler, depth, state, &name)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Run a text-showing operator with the current font and emit its glyphs.
fn show_text<F>(
    state: &mut InterpreterState,
    fonts: &HashMap<String, LoadedFont>,
    handler: &mut dyn ContentHandler,
    show: F,
) where
    F: FnOnce(&mut TextState, CodeWidth, &dyn Fn(u32) -> f64) -> Vec<RawChar>,
{
    let fallback;
    let font = match fonts.get(&state.text.font_name) {
        Some(font) => font,
        None => {
            fallback = LoadedFont::fallback(&state.text.font_name);
            &fallback
        }
    };

    let get_width = |code: u32| font.metrics.get_width(code);
    let raw = show(&mut state.text, font.code_width, &get_width);

    for rc in raw {
        handler.on_char(CharEvent {
            char_code: rc.char_code,
            unicode: font.unicode(rc.char_code),
            font_name: font.base_name.clone(),
            font_size: state.text.font_size,
            text_matrix: rc.text_matrix,
            ctm: state.ctm.to_array(),
            displacement: rc.glyph_width,
            h_scaling: state.text.h_scaling_normalized(),
            rise: state.text.rise,
            ascent: font.metrics.ascent(),
            descent: font.metrics.descent(),
        });
    }
}

fn load_font(doc: &lopdf::Document, resources: &lopdf::Dictionary, name: &str) -> LoadedFont {
    let font_dict = resources
        .get(b"Font")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|fonts| fonts.get(name.as_bytes()).ok())
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok());

    let Some(font_dict) = font_dict else {
        #[cfg(feature = "tracing")]
        tracing::warn!(font = name, "font resource not found, using default metrics");
        return LoadedFont::fallback(name);
    };

    let to_unicode = font_dict
        .get(b"ToUnicode")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_stream().ok())
        .and_then(|stream| match decode_stream(stream) {
            Ok(bytes) => ToUnicodeCMap::parse(&bytes).ok(),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(font = name, error = %_e, "undecodable ToUnicode stream");
                None
            }
        });

    let code_width = if is_type0_font(font_dict) {
        CodeWidth::Double
    } else {
        CodeWidth::Single
    };

    LoadedFont {
        base_name: base_font_name(font_dict).unwrap_or(name).to_string(),
        metrics: extract_font_metrics(doc, font_dict),
        encoding: SimpleEncoding::from_font_dict(doc, font_dict),
        to_unicode,
        code_width,
    }
}

fn handle_do(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    state: &mut InterpreterState,
    name: &str,
) -> Result<(), BackendError> {
    let stream = resources
        .get(b"XObject")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_stream().ok());

    let Some(stream) = stream else {
        #[cfg(feature = "tracing")]
        tracing::warn!(xobject = name, "XObject not found in resources");
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|s| s == b"Form");
    if !is_form {
        return Ok(());
    }

    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .unwrap_or(resources);

    let bytes = decode_stream(stream).map_err(|e| {
        BackendError::Interpreter(format!("failed to decode Form XObject /{name}: {e}"))
    })?;

    state.save();
    if let Some(m) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|obj| obj.as_array().ok())
        .and_then(|arr| matrix_operand(arr))
    {
        state.concat(m);
    }
    let result = interpret_content_stream(doc, &bytes, form_resources, handler, depth + 1, state);
    state.restore();
    result
}

/// Decode a PDF stream, decompressing if a /Filter is present.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Interpreter(format!("stream decompression failed: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

fn number_at(op: &Operation, index: usize) -> Option<f64> {
    op.operands.get(index).and_then(object_to_f64_opt)
}

fn set_number(op: &Operation, target: &mut f64) {
    if let Some(v) = number_at(op, 0) {
        *target = v;
    }
}

fn name_at(op: &Operation, index: usize) -> Option<String> {
    op.operands
        .get(index)
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

fn string_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes),
        _ => None,
    }
}

fn matrix_operand(operands: &[Object]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    let mut values = [0.0; 6];
    for (slot, obj) in values.iter_mut().zip(operands) {
        *slot = object_to_f64_opt(obj)?;
    }
    Some(Ctm::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Document, Stream, dictionary};

    #[derive(Default)]
    struct Collecting {
        chars: Vec<CharEvent>,
    }

    impl ContentHandler for Collecting {
        fn on_char(&mut self, event: CharEvent) {
            self.chars.push(event);
        }
    }

    fn run(doc: &Document, resources: &Dictionary, stream: &[u8]) -> Vec<CharEvent> {
        let mut handler = Collecting::default();
        let mut state = InterpreterState::new();
        interpret_content_stream(doc, stream, resources, &mut handler, 0, &mut state).unwrap();
        handler.chars
    }

    fn helvetica_resources(doc: &mut Document) -> Dictionary {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        dictionary! { "Font" => dictionary! { "F1" => font_id } }
    }

    fn text(chars: &[CharEvent]) -> String {
        chars
            .iter()
            .filter_map(|c| c.unicode.clone())
            .collect::<String>()
    }

    #[test]
    fn simple_text_uses_standard_widths() {
        let mut doc = Document::with_version("1.5");
        let resources = helvetica_resources(&mut doc);
        let chars = run(&doc, &resources, b"BT /F1 12 Tf 72 700 Td (Hi) Tj ET");
        assert_eq!(text(&chars), "Hi");
        assert_eq!(chars[0].font_name, "Helvetica");
        assert_eq!(chars[0].font_size, 12.0);
        assert_eq!(chars[0].text_matrix[4], 72.0);
        // H is 722 wide in Helvetica
        assert!((chars[1].text_matrix[4] - (72.0 + 12.0 * 0.722)).abs() < 1e-9);
    }

    #[test]
    fn tj_array_and_quote_operators() {
        let mut doc = Document::with_version("1.5");
        let resources = helvetica_resources(&mut doc);
        let chars = run(
            &doc,
            &resources,
            b"BT /F1 10 Tf 14 TL 0 100 Td [(A) -200 (B)] TJ (C) ' 1 0 (D) \" ET",
        );
        assert_eq!(text(&chars), "ABCD");
        assert_eq!(chars[2].text_matrix[5], 86.0);
        assert_eq!(chars[3].text_matrix[5], 72.0);
    }

    #[test]
    fn ctm_and_state_stack() {
        let mut doc = Document::with_version("1.5");
        let resources = helvetica_resources(&mut doc);
        let chars = run(
            &doc,
            &resources,
            b"q 2 0 0 2 10 20 cm BT /F1 12 Tf (a) Tj ET Q BT /F1 12 Tf (b) Tj ET",
        );
        assert_eq!(chars[0].ctm, [2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);
        assert_eq!(chars[1].ctm, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_font_falls_back() {
        let doc = Document::with_version("1.5");
        let chars = run(&doc, &Dictionary::new(), b"BT /F9 12 Tf (x) Tj ET");
        assert_eq!(chars.len(), 1);
        assert_eq!(chars[0].unicode.as_deref(), Some("x"));
        assert_eq!(chars[0].displacement, 600.0);
    }

    #[test]
    fn form_xobject_is_followed_with_matrix() {
        let mut doc = Document::with_version("1.5");
        let mut resources = helvetica_resources(&mut doc);
        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 60.into()],
                "Resources" => resources.clone(),
            },
            b"BT /F1 12 Tf (Z) Tj ET".to_vec(),
        );
        let form_id = doc.add_object(form);
        resources.set("XObject", dictionary! { "Fm1" => form_id });

        let chars = run(&doc, &resources, b"/Fm1 Do");
        assert_eq!(text(&chars), "Z");
        assert_eq!(chars[0].ctm[4], 50.0);
        assert_eq!(chars[0].ctm[5], 60.0);
    }

    #[test]
    fn self_referencing_form_hits_depth_limit() {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.new_object_id();
        let resources = dictionary! { "XObject" => dictionary! { "Fm1" => form_id } };
        doc.objects.insert(
            form_id,
            Object::Stream(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "Resources" => resources.clone(),
                },
                b"/Fm1 Do".to_vec(),
            )),
        );

        let mut handler = Collecting::default();
        let mut state = InterpreterState::new();
        let err = interpret_content_stream(&doc, b"/Fm1 Do", &resources, &mut handler, 0, &mut state)
            .unwrap_err();
        assert!(err.to_string().contains("recursion depth"));
    }

    #[test]
    fn to_unicode_overrides_encoding() {
        let mut doc = Document::with_version("1.5");
        let cmap = Stream::new(
            Dictionary::new(),
            b"beginbfchar\n<41> <0042>\nendbfchar".to_vec(),
        );
        let cmap_id = doc.add_object(cmap);
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "ToUnicode" => cmap_id,
        });
        let resources = dictionary! { "Font" => dictionary! { "F1" => font_id } };
        let chars = run(&doc, &resources, b"BT /F1 12 Tf (AC) Tj ET");
        assert_eq!(text(&chars), "BC");
    }
}
