//! Built-in SVG to VectorDrawable conversion.
//!
//! Covers the static subset icon sets actually use: shapes, paths, groups
//! with simple transforms, and flat colors. Anything outside that subset is
//! reported back as a conversion error rather than silently dropped.

use crate::converter::SvgConverter;
use crate::error::{Result, VdToolError};
use crate::vector::ANDROID_NS;
use regex::Regex;
use roxmltree::{Document, Node};
use std::path::Path;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const LENGTH_PATTERN: &str =
    r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(px|pt|pc|mm|cm|in|%)?\s*$";
const TRANSFORM_PATTERN: &str = r"([A-Za-z]+)\s*\(([^)]*)\)";

pub struct BuiltinConverter {
    length: Regex,
    transform: Regex,
}

impl BuiltinConverter {
    pub fn new() -> Self {
        Self {
            length: Regex::new(LENGTH_PATTERN).expect("length pattern compiles"),
            transform: Regex::new(TRANSFORM_PATTERN).expect("transform pattern compiles"),
        }
    }

    /// Converts SVG text. The error string lists every problem found.
    pub fn convert_str(&self, svg: &str) -> std::result::Result<String, String> {
        let doc = Document::parse(svg).map_err(|e| format!("invalid SVG document: {}", e))?;
        let root = doc.root_element();

        if root.tag_name().name() != "svg" {
            return Err(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            ));
        }

        let view_box = root
            .attribute("viewBox")
            .map(parse_view_box)
            .transpose()?;
        let width = root
            .attribute("width")
            .map(|v| self.parse_length(v, view_box.map(|b| b.width)))
            .transpose()?;
        let height = root
            .attribute("height")
            .map(|v| self.parse_length(v, view_box.map(|b| b.height)))
            .transpose()?;

        let (viewport_width, viewport_height) = match (view_box, width, height) {
            (Some(b), _, _) => (b.width, b.height),
            (None, Some(w), Some(h)) => (w, h),
            _ => return Err("<svg> needs a viewBox or both width and height".to_string()),
        };
        let width = width.unwrap_or(viewport_width);
        let height = height.unwrap_or(viewport_height);

        if width <= 0.0 || height <= 0.0 || viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Err("<svg> has an empty size".to_string());
        }

        let mut writer = VectorWriter::new();
        writer.open_vector(width, height, viewport_width, viewport_height);

        let origin_shift = view_box
            .filter(|b| b.min_x != 0.0 || b.min_y != 0.0)
            .map(|b| GroupTransform {
                translate: Some((-b.min_x, -b.min_y)),
                ..GroupTransform::default()
            });
        if let Some(ref shift) = origin_shift {
            writer.open_group(shift);
        }

        let mut issues = Vec::new();
        let style = Style::default();
        for child in root.children() {
            self.emit_node(child, &style, &mut writer, &mut issues);
        }

        if origin_shift.is_some() {
            writer.close_group();
        }

        if !issues.is_empty() {
            return Err(issues.join("; "));
        }

        Ok(writer.finish())
    }

    fn emit_node(
        &self,
        node: Node<'_, '_>,
        parent: &Style,
        writer: &mut VectorWriter,
        issues: &mut Vec<String>,
    ) {
        if !node.is_element() {
            return;
        }

        // Editor metadata (Inkscape, Sketch, ...) lives in other namespaces.
        if let Some(ns) = node.tag_name().namespace() {
            if ns != SVG_NS {
                return;
            }
        }

        let name = node.tag_name().name();
        match name {
            "title" | "desc" | "metadata" | "defs" | "linearGradient" | "radialGradient" => {}
            "g" | "path" | "rect" | "circle" | "ellipse" | "line" | "polyline" | "polygon" => {
                let style = match parent.inherit(node) {
                    Ok(style) => style,
                    Err(issue) => {
                        issues.push(format!("<{}>: {}", name, issue));
                        return;
                    }
                };
                if style.hidden {
                    return;
                }

                let transforms = match node.attribute("transform") {
                    Some(value) => match self.parse_transform(value) {
                        Ok(transforms) => transforms,
                        Err(issue) => {
                            issues.push(format!("<{}>: {}", name, issue));
                            return;
                        }
                    },
                    None => Vec::new(),
                };

                for transform in &transforms {
                    writer.open_group(transform);
                }

                if name == "g" {
                    for child in node.children() {
                        self.emit_node(child, &style, writer, issues);
                    }
                } else {
                    match self.shape_path(node) {
                        Ok(Some(data)) => writer.path(&data, &style),
                        Ok(None) => {}
                        Err(issue) => issues.push(format!("<{}>: {}", name, issue)),
                    }
                }

                for _ in &transforms {
                    writer.close_group();
                }
            }
            other => issues.push(format!("<{}> is not supported", other)),
        }
    }

    fn shape_path(&self, node: Node<'_, '_>) -> std::result::Result<Option<String>, String> {
        let num = |attr: &str| -> std::result::Result<f64, String> {
            match node.attribute(attr) {
                Some(value) => self.parse_length(value, None),
                None => Ok(0.0),
            }
        };

        let data = match node.tag_name().name() {
            "path" => {
                let d = node.attribute("d").unwrap_or("");
                let d = d.split_whitespace().collect::<Vec<_>>().join(" ");
                if d.is_empty() {
                    return Ok(None);
                }
                d
            }
            "rect" => {
                let (x, y, w, h) = (num("x")?, num("y")?, num("width")?, num("height")?);
                if w <= 0.0 || h <= 0.0 {
                    return Ok(None);
                }
                let (rx, ry) = match (node.attribute("rx"), node.attribute("ry")) {
                    (None, None) => (0.0, 0.0),
                    (Some(_), None) => (num("rx")?, num("rx")?),
                    (None, Some(_)) => (num("ry")?, num("ry")?),
                    (Some(_), Some(_)) => (num("rx")?, num("ry")?),
                };
                rect_path(x, y, w, h, rx.min(w / 2.0), ry.min(h / 2.0))
            }
            "circle" => {
                let r = num("r")?;
                if r <= 0.0 {
                    return Ok(None);
                }
                ellipse_path(num("cx")?, num("cy")?, r, r)
            }
            "ellipse" => {
                let (rx, ry) = (num("rx")?, num("ry")?);
                if rx <= 0.0 || ry <= 0.0 {
                    return Ok(None);
                }
                ellipse_path(num("cx")?, num("cy")?, rx, ry)
            }
            "line" => format!(
                "M{},{} L{},{}",
                fmt_num(num("x1")?),
                fmt_num(num("y1")?),
                fmt_num(num("x2")?),
                fmt_num(num("y2")?)
            ),
            kind @ ("polyline" | "polygon") => {
                let points = parse_numbers(node.attribute("points").unwrap_or(""))?;
                if points.len() < 4 {
                    return Ok(None);
                }
                let mut data = String::new();
                for (index, pair) in points.chunks_exact(2).enumerate() {
                    let command = if index == 0 { "M" } else { " L" };
                    data.push_str(&format!("{}{},{}", command, fmt_num(pair[0]), fmt_num(pair[1])));
                }
                if kind == "polygon" {
                    data.push_str(" z");
                }
                data
            }
            _ => return Ok(None),
        };

        Ok(Some(data))
    }

    /// Length in px. Percentages need a reference length.
    fn parse_length(
        &self,
        value: &str,
        reference: Option<f64>,
    ) -> std::result::Result<f64, String> {
        let captures = self
            .length
            .captures(value)
            .ok_or_else(|| format!("invalid length '{}'", value))?;

        let number: f64 = captures[1]
            .parse()
            .map_err(|_| format!("invalid number '{}'", &captures[1]))?;

        let scale = match captures.get(2).map(|m| m.as_str()) {
            None | Some("px") => 1.0,
            Some("pt") => 1.25,
            Some("pc") => 15.0,
            Some("mm") => 3.543_307,
            Some("cm") => 35.433_07,
            Some("in") => 90.0,
            Some("%") => match reference {
                Some(reference) => reference / 100.0,
                None => return Err(format!("percentage '{}' has nothing to refer to", value)),
            },
            Some(unit) => return Err(format!("unsupported unit '{}'", unit)),
        };

        Ok(number * scale)
    }

    fn parse_transform(&self, value: &str) -> std::result::Result<Vec<GroupTransform>, String> {
        let mut transforms = Vec::new();

        for captures in self.transform.captures_iter(value) {
            let args = parse_numbers(&captures[2])?;
            let transform = match (&captures[1], args.as_slice()) {
                ("translate", [tx]) => GroupTransform {
                    translate: Some((*tx, 0.0)),
                    ..GroupTransform::default()
                },
                ("translate", [tx, ty]) => GroupTransform {
                    translate: Some((*tx, *ty)),
                    ..GroupTransform::default()
                },
                ("scale", [s]) => GroupTransform {
                    scale: Some((*s, *s)),
                    ..GroupTransform::default()
                },
                ("scale", [sx, sy]) => GroupTransform {
                    scale: Some((*sx, *sy)),
                    ..GroupTransform::default()
                },
                ("rotate", [angle]) => GroupTransform {
                    rotation: Some((*angle, 0.0, 0.0)),
                    ..GroupTransform::default()
                },
                ("rotate", [angle, cx, cy]) => GroupTransform {
                    rotation: Some((*angle, *cx, *cy)),
                    ..GroupTransform::default()
                },
                (kind, _) => return Err(format!("transform '{}' is not supported", kind)),
            };
            transforms.push(transform);
        }

        if transforms.is_empty() && !value.trim().is_empty() {
            return Err(format!("invalid transform '{}'", value));
        }

        Ok(transforms)
    }
}

impl Default for BuiltinConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgConverter for BuiltinConverter {
    fn convert(&self, input: &Path) -> Result<String> {
        let svg = std::fs::read_to_string(input)
            .map_err(|e| VdToolError::conversion(input, format!("cannot read file: {}", e)))?;

        self.convert_str(&svg)
            .map_err(|message| VdToolError::conversion(input, message))
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

#[derive(Debug, Clone, Copy)]
struct ViewBox {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
}

fn parse_view_box(value: &str) -> std::result::Result<ViewBox, String> {
    match parse_numbers(value)?.as_slice() {
        [min_x, min_y, width, height] => Ok(ViewBox {
            min_x: *min_x,
            min_y: *min_y,
            width: *width,
            height: *height,
        }),
        _ => Err(format!("invalid viewBox '{}'", value)),
    }
}

fn parse_numbers(value: &str) -> std::result::Result<Vec<f64>, String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| format!("invalid number '{}'", s)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Paint {
    None,
    Color(u32),
}

#[derive(Debug, Clone)]
struct Style {
    fill: Paint,
    fill_opacity: f64,
    fill_rule: Option<&'static str>,
    stroke: Paint,
    stroke_width: f64,
    stroke_opacity: f64,
    line_cap: Option<&'static str>,
    line_join: Option<&'static str>,
    opacity: f64,
    hidden: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Paint::Color(0x000000),
            fill_opacity: 1.0,
            fill_rule: None,
            stroke: Paint::None,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            line_cap: None,
            line_join: None,
            opacity: 1.0,
            hidden: false,
        }
    }
}

impl Style {
    /// Style for `node`: inherited values, then presentation attributes,
    /// then the `style` attribute.
    fn inherit(&self, node: Node<'_, '_>) -> std::result::Result<Style, String> {
        let mut style = self.clone();

        for attr in node.attributes() {
            if attr.namespace().is_none() {
                style.apply(attr.name(), attr.value())?;
            }
        }

        if let Some(inline) = node.attribute("style") {
            for declaration in inline.split(';') {
                if let Some((name, value)) = declaration.split_once(':') {
                    style.apply(name.trim(), value.trim())?;
                }
            }
        }

        Ok(style)
    }

    fn apply(&mut self, name: &str, value: &str) -> std::result::Result<(), String> {
        if value == "inherit" {
            return Ok(());
        }

        match name {
            "fill" => self.fill = parse_paint(value)?,
            "stroke" => self.stroke = parse_paint(value)?,
            "fill-opacity" => self.fill_opacity = parse_opacity(value)?,
            "stroke-opacity" => self.stroke_opacity = parse_opacity(value)?,
            "opacity" => self.opacity *= parse_opacity(value)?,
            "stroke-width" => {
                self.stroke_width = value
                    .trim_end_matches("px")
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid stroke-width '{}'", value))?
            }
            "fill-rule" => {
                self.fill_rule = match value {
                    "evenodd" => Some("evenOdd"),
                    _ => Some("nonZero"),
                }
            }
            "stroke-linecap" => {
                self.line_cap = match value {
                    "round" => Some("round"),
                    "square" => Some("square"),
                    _ => Some("butt"),
                }
            }
            "stroke-linejoin" => {
                self.line_join = match value {
                    "round" => Some("round"),
                    "bevel" => Some("bevel"),
                    _ => Some("miter"),
                }
            }
            "display" => self.hidden |= value == "none",
            "visibility" => self.hidden = value == "hidden" || value == "collapse",
            _ => {}
        }

        Ok(())
    }
}

fn parse_opacity(value: &str) -> std::result::Result<f64, String> {
    let opacity: f64 = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map(|p| p / 100.0),
        None => value.trim().parse(),
    }
    .map_err(|_| format!("invalid opacity '{}'", value))?;

    Ok(opacity.clamp(0.0, 1.0))
}

fn parse_paint(value: &str) -> std::result::Result<Paint, String> {
    let value = value.trim();
    if value == "none" || value == "transparent" {
        return Ok(Paint::None);
    }
    if value.starts_with("url(") {
        return Err("gradient and pattern paints are not supported".to_string());
    }
    parse_color(value)
        .map(Paint::Color)
        .ok_or_else(|| format!("unsupported color '{}'", value))
}

fn parse_color(value: &str) -> Option<u32> {
    if let Some(hex) = value.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok()
            }
            6 => u32::from_str_radix(hex, 16).ok(),
            _ => None,
        };
    }

    if let Some(args) = value
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels: Vec<u32> = args
            .split(',')
            .map(|c| {
                let c = c.trim();
                let value = match c.strip_suffix('%') {
                    Some(p) => p.trim().parse::<f64>().ok().map(|p| p * 2.55),
                    None => c.parse::<f64>().ok(),
                };
                value.map(|v| v.round().clamp(0.0, 255.0) as u32)
            })
            .collect::<Option<Vec<_>>>()?;
        return match channels.as_slice() {
            [r, g, b] => Some((r << 16) | (g << 8) | b),
            _ => None,
        };
    }

    let named = match value.to_ascii_lowercase().as_str() {
        "black" | "currentcolor" => 0x000000,
        "white" => 0xFFFFFF,
        "red" => 0xFF0000,
        "lime" => 0x00FF00,
        "green" => 0x008000,
        "blue" => 0x0000FF,
        "yellow" => 0xFFFF00,
        "cyan" | "aqua" => 0x00FFFF,
        "magenta" | "fuchsia" => 0xFF00FF,
        "gray" | "grey" => 0x808080,
        "silver" => 0xC0C0C0,
        "maroon" => 0x800000,
        "navy" => 0x000080,
        "olive" => 0x808000,
        "purple" => 0x800080,
        "teal" => 0x008080,
        "orange" => 0xFFA500,
        _ => return None,
    };
    Some(named)
}

#[derive(Debug, Clone, Default)]
struct GroupTransform {
    translate: Option<(f64, f64)>,
    scale: Option<(f64, f64)>,
    rotation: Option<(f64, f64, f64)>,
}

fn rect_path(x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64) -> String {
    if rx <= 0.0 || ry <= 0.0 {
        return format!(
            "M{},{} h{} v{} h{} z",
            fmt_num(x),
            fmt_num(y),
            fmt_num(w),
            fmt_num(h),
            fmt_num(-w)
        );
    }

    let arc = |dx: f64, dy: f64| format!("a{},{} 0 0 1 {},{}", fmt_num(rx), fmt_num(ry), fmt_num(dx), fmt_num(dy));
    format!(
        "M{},{} h{} {} v{} {} h{} {} v{} {} z",
        fmt_num(x + rx),
        fmt_num(y),
        fmt_num(w - 2.0 * rx),
        arc(rx, ry),
        fmt_num(h - 2.0 * ry),
        arc(-rx, ry),
        fmt_num(-(w - 2.0 * rx)),
        arc(-rx, -ry),
        fmt_num(-(h - 2.0 * ry)),
        arc(rx, -ry)
    )
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    format!(
        "M{},{} a{},{} 0 1 0 {},0 a{},{} 0 1 0 {},0 z",
        fmt_num(cx - rx),
        fmt_num(cy),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(2.0 * rx),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(-2.0 * rx)
    )
}

fn fmt_num(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

struct VectorWriter {
    out: String,
    depth: usize,
}

impl VectorWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn open_vector(&mut self, width: f64, height: f64, viewport_width: f64, viewport_height: f64) {
        self.out.push_str(&format!("<vector xmlns:android=\"{}\"", ANDROID_NS));
        self.out.push_str(&format!("\n    android:width=\"{}dp\"", fmt_num(width)));
        self.out.push_str(&format!("\n    android:height=\"{}dp\"", fmt_num(height)));
        self.out.push_str(&format!(
            "\n    android:viewportWidth=\"{}\"",
            fmt_num(viewport_width)
        ));
        self.out.push_str(&format!(
            "\n    android:viewportHeight=\"{}\">\n",
            fmt_num(viewport_height)
        ));
        self.depth = 1;
    }

    fn open_group(&mut self, transform: &GroupTransform) {
        let mut attrs = Vec::new();
        if let Some((tx, ty)) = transform.translate {
            attrs.push(("translateX", fmt_num(tx)));
            attrs.push(("translateY", fmt_num(ty)));
        }
        if let Some((sx, sy)) = transform.scale {
            attrs.push(("scaleX", fmt_num(sx)));
            attrs.push(("scaleY", fmt_num(sy)));
        }
        if let Some((angle, px, py)) = transform.rotation {
            attrs.push(("rotation", fmt_num(angle)));
            attrs.push(("pivotX", fmt_num(px)));
            attrs.push(("pivotY", fmt_num(py)));
        }

        self.element("group", &attrs, false);
        self.depth += 1;
    }

    fn close_group(&mut self) {
        self.depth -= 1;
        let pad = "    ".repeat(self.depth);
        self.out.push_str(&format!("{}</group>\n", pad));
    }

    fn path(&mut self, data: &str, style: &Style) {
        let mut attrs = Vec::new();

        let fill_alpha = style.fill_opacity * style.opacity;
        let stroke_alpha = style.stroke_opacity * style.opacity;
        let has_fill = matches!(style.fill, Paint::Color(_)) && fill_alpha > 0.0;
        let has_stroke = matches!(style.stroke, Paint::Color(_))
            && stroke_alpha > 0.0
            && style.stroke_width > 0.0;

        if !has_fill && !has_stroke {
            return;
        }

        if let (true, Paint::Color(rgb)) = (has_fill, style.fill) {
            attrs.push(("fillColor", format!("#FF{:06X}", rgb)));
            if fill_alpha < 1.0 {
                attrs.push(("fillAlpha", fmt_num(fill_alpha)));
            }
        }
        if let (true, Paint::Color(rgb)) = (has_stroke, style.stroke) {
            attrs.push(("strokeColor", format!("#FF{:06X}", rgb)));
            attrs.push(("strokeWidth", fmt_num(style.stroke_width)));
            if stroke_alpha < 1.0 {
                attrs.push(("strokeAlpha", fmt_num(stroke_alpha)));
            }
            if let Some(cap) = style.line_cap {
                attrs.push(("strokeLineCap", cap.to_string()));
            }
            if let Some(join) = style.line_join {
                attrs.push(("strokeLineJoin", join.to_string()));
            }
        }
        if let Some(rule) = style.fill_rule {
            attrs.push(("fillType", rule.to_string()));
        }
        attrs.push(("pathData", escape_attr(data)));

        self.element("path", &attrs, true);
    }

    fn element(&mut self, tag: &str, attrs: &[(&str, String)], self_closing: bool) {
        let pad = "    ".repeat(self.depth);
        self.out.push_str(&format!("{}<{}", pad, tag));
        for (name, value) in attrs {
            self.out
                .push_str(&format!("\n{}    android:{}=\"{}\"", pad, name, value));
        }
        self.out.push_str(if self_closing { "/>\n" } else { ">\n" });
    }

    fn finish(mut self) -> String {
        self.out.push_str("</vector>\n");
        self.out
    }
}
