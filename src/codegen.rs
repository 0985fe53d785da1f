//! Component code generation.
//!
//! Each supported component has one template: a small fragment tree
//! ([`Node`]) describing the markup with its styling classes, bound props,
//! event hooks and content slots. A template is rendered once per framework
//! by [`render_markup`], then wrapped in that framework's component scaffold
//! (React function component, Vue SFC, Angular standalone component, or a
//! plain HTML snippet).
//!
//! Output is a pure function of `(component, variant, framework,
//! include_imports)`: no clock, no randomness, no hash-map iteration.

use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::corpus::ComponentSpec;
use crate::error::{DesignError, Result};

/// Components that have a template, in listing order.
pub const TEMPLATED_COMPONENTS: &[&str] = &["button", "input", "card", "modal", "badge", "alert"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    React,
    Vue,
    Angular,
    Html,
}

impl Framework {
    pub const ALL: &'static [Framework] = &[
        Framework::React,
        Framework::Vue,
        Framework::Angular,
        Framework::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Angular => "angular",
            Framework::Html => "html",
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl FromStr for Framework {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "react" => Ok(Framework::React),
            "vue" => Ok(Framework::Vue),
            "angular" => Ok(Framework::Angular),
            "html" => Ok(Framework::Html),
            _ => Err(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Fragment tree
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropType {
    Bool,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// Styling classes (`className` in React).
    Class(String),
    /// Literal attribute.
    Static(&'static str, &'static str),
    /// Attribute bound to a component prop.
    Bind {
        attr: &'static str,
        prop: &'static str,
        ty: PropType,
    },
    /// DOM event forwarded through a handler prop (`onClick`) or emitted event.
    Event {
        dom: &'static str,
        handler: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        attrs: Vec<Attr>,
        children: Vec<Node>,
    },
    Text(&'static str),
    /// Content insertion point. `name: None` is the default slot (children);
    /// named slots become string props. `fallback` is used by static HTML.
    Slot {
        name: Option<&'static str>,
        fallback: &'static str,
    },
}

fn el(tag: &'static str, attrs: Vec<Attr>, children: Vec<Node>) -> Node {
    Node::Element {
        tag,
        attrs,
        children,
    }
}

fn class(base: &str, variant: &str) -> Attr {
    if variant.is_empty() {
        Attr::Class(base.to_string())
    } else {
        Attr::Class(format!("{} {}", base, variant))
    }
}

fn slot(name: Option<&'static str>, fallback: &'static str) -> Node {
    Node::Slot { name, fallback }
}

const VOID_TAGS: &[&str] = &["input", "img", "br", "hr"];

// ═══════════════════════════════════════════════════════════════════════
// Templates
// ═══════════════════════════════════════════════════════════════════════

fn variant_classes(component: &str, variant: &str) -> &'static str {
    match (component, variant) {
        ("button", "primary") => "bg-blue-600 text-white hover:bg-blue-700 focus:ring-blue-500",
        ("button", "secondary") => "bg-gray-600 text-white hover:bg-gray-700 focus:ring-gray-500",
        ("button", "outline") => {
            "border border-gray-300 bg-white text-gray-700 hover:bg-gray-50 focus:ring-blue-500"
        }
        ("button", "ghost") => "bg-transparent text-gray-700 hover:bg-gray-100 focus:ring-gray-500",
        ("button", "danger") => "bg-red-600 text-white hover:bg-red-700 focus:ring-red-500",

        ("input", "default") => "border-gray-300 focus:border-blue-500 focus:ring-blue-500",
        ("input", "error") => "border-red-500 focus:border-red-500 focus:ring-red-500",
        ("input", "success") => "border-green-500 focus:border-green-500 focus:ring-green-500",

        ("card", "default") => "border border-gray-200 bg-white",
        ("card", "elevated") => "bg-white shadow-lg",
        ("card", "outlined") => "border-2 border-gray-300 bg-transparent",

        ("modal", "default") => "max-w-lg",
        ("modal", "small") => "max-w-sm",
        ("modal", "large") => "max-w-3xl",

        ("badge", "default") => "bg-gray-100 text-gray-800",
        ("badge", "success") => "bg-green-100 text-green-800",
        ("badge", "warning") => "bg-amber-100 text-amber-800",
        ("badge", "danger") => "bg-red-100 text-red-800",
        ("badge", "info") => "bg-blue-100 text-blue-800",

        ("alert", "info") => "border-blue-200 bg-blue-50 text-blue-800",
        ("alert", "success") => "border-green-200 bg-green-50 text-green-800",
        ("alert", "warning") => "border-amber-200 bg-amber-50 text-amber-800",
        ("alert", "error") => "border-red-200 bg-red-50 text-red-800",

        _ => "",
    }
}

/// Fragment tree for one component variant, or `None` when the component has no template.
pub fn template(component: &str, variant: &str) -> Option<Node> {
    let v = variant_classes(component, variant);
    let node = match component {
        "button" => el(
            "button",
            vec![
                Attr::Static("type", "button"),
                class(
                    "inline-flex items-center justify-center rounded-md px-4 py-2 text-sm \
                     font-medium focus:outline-none focus:ring-2 focus:ring-offset-2 \
                     disabled:opacity-50",
                    v,
                ),
                Attr::Bind {
                    attr: "disabled",
                    prop: "disabled",
                    ty: PropType::Bool,
                },
                Attr::Event {
                    dom: "click",
                    handler: "onClick",
                },
            ],
            vec![slot(None, "Button")],
        ),
        "input" => {
            let mut children = vec![
                el(
                    "label",
                    vec![Attr::Class(
                        "block text-sm font-medium text-gray-700".to_string(),
                    )],
                    vec![slot(Some("label"), "Email")],
                ),
                el(
                    "input",
                    vec![
                        Attr::Static("type", "text"),
                        class(
                            "mt-1 block w-full rounded-md border px-3 py-2 text-sm shadow-sm \
                             focus:outline-none focus:ring-1",
                            v,
                        ),
                        Attr::Bind {
                            attr: "placeholder",
                            prop: "placeholder",
                            ty: PropType::Text,
                        },
                        Attr::Bind {
                            attr: "value",
                            prop: "value",
                            ty: PropType::Text,
                        },
                        Attr::Event {
                            dom: "input",
                            handler: "onChange",
                        },
                    ],
                    Vec::new(),
                ),
            ];
            if variant == "error" {
                if let Some(Node::Element { attrs, .. }) = children.get_mut(1) {
                    attrs.push(Attr::Static("aria-invalid", "true"));
                }
            }
            let message_class = match variant {
                "error" => Some("mt-1 text-sm text-red-600"),
                "success" => Some("mt-1 text-sm text-green-600"),
                _ => None,
            };
            if let Some(message_class) = message_class {
                children.push(el(
                    "p",
                    vec![Attr::Class(message_class.to_string())],
                    vec![slot(Some("message"), "Helper text")],
                ));
            }
            el("div", Vec::new(), children)
        }
        "card" => el(
            "div",
            vec![class("rounded-lg p-6", v)],
            vec![
                el(
                    "h3",
                    vec![Attr::Class(
                        "text-lg font-semibold text-gray-900".to_string(),
                    )],
                    vec![slot(Some("title"), "Card title")],
                ),
                el(
                    "div",
                    vec![Attr::Class("mt-2 text-sm text-gray-600".to_string())],
                    vec![slot(None, "Card content")],
                ),
            ],
        ),
        "modal" => el(
            "div",
            vec![Attr::Class(
                "fixed inset-0 z-50 flex items-center justify-center bg-black/50".to_string(),
            )],
            vec![el(
                "div",
                vec![
                    Attr::Static("role", "dialog"),
                    Attr::Static("aria-modal", "true"),
                    class("w-full rounded-lg bg-white p-6 shadow-xl", v),
                ],
                vec![
                    el(
                        "h2",
                        vec![Attr::Class(
                            "text-lg font-semibold text-gray-900".to_string(),
                        )],
                        vec![slot(Some("title"), "Dialog title")],
                    ),
                    el(
                        "div",
                        vec![Attr::Class("mt-4".to_string())],
                        vec![slot(None, "Dialog content")],
                    ),
                    el(
                        "button",
                        vec![
                            Attr::Static("type", "button"),
                            Attr::Static("aria-label", "Close"),
                            Attr::Class(
                                "mt-6 rounded-md px-4 py-2 text-sm text-gray-700 \
                                 hover:bg-gray-100"
                                    .to_string(),
                            ),
                            Attr::Event {
                                dom: "click",
                                handler: "onClose",
                            },
                        ],
                        vec![Node::Text("Close")],
                    ),
                ],
            )],
        ),
        "badge" => el(
            "span",
            vec![class(
                "inline-flex items-center rounded-full px-2.5 py-0.5 text-xs font-medium",
                v,
            )],
            vec![slot(None, "Badge")],
        ),
        "alert" => el(
            "div",
            vec![Attr::Static("role", "alert"), class("rounded-md border p-4", v)],
            vec![
                el(
                    "p",
                    vec![Attr::Class("font-medium".to_string())],
                    vec![slot(Some("title"), "Heads up")],
                ),
                el(
                    "p",
                    vec![Attr::Class("mt-1 text-sm".to_string())],
                    vec![slot(None, "Alert message")],
                ),
            ],
        ),
        _ => return None,
    };
    Some(node)
}

// ═══════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════

/// A prop or event the scaffold must declare.
#[derive(Debug, Clone, PartialEq)]
enum Binding {
    Prop(&'static str, PropType),
    Event(&'static str, &'static str),
    Children,
}

fn collect_bindings(node: &Node, out: &mut Vec<Binding>) {
    let mut push = |b: Binding| {
        if !out.contains(&b) {
            out.push(b);
        }
    };
    match node {
        Node::Element {
            attrs, children, ..
        } => {
            for attr in attrs {
                match attr {
                    Attr::Bind { prop, ty, .. } => push(Binding::Prop(prop, *ty)),
                    Attr::Event { dom, handler } => push(Binding::Event(dom, handler)),
                    _ => {}
                }
            }
            for child in children {
                collect_bindings(child, out);
            }
        }
        Node::Slot { name: Some(n), .. } => push(Binding::Prop(n, PropType::Text)),
        Node::Slot { name: None, .. } => push(Binding::Children),
        Node::Text(_) => {}
    }
}

/// `onClose` → `close`.
fn emitted_name(handler: &str) -> String {
    let bare = handler.strip_prefix("on").unwrap_or(handler);
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_attr(framework: Framework, attr: &Attr) -> Option<String> {
    let rendered = match (framework, attr) {
        (Framework::React, Attr::Class(c)) => format!("className=\"{}\"", c),
        (_, Attr::Class(c)) => format!("class=\"{}\"", c),
        (_, Attr::Static(name, value)) => format!("{}=\"{}\"", name, value),

        (Framework::React, Attr::Bind { attr, prop, .. }) => format!("{}={{{}}}", attr, prop),
        (Framework::Vue, Attr::Bind { attr, prop, .. }) => format!(":{}=\"{}\"", attr, prop),
        (Framework::Angular, Attr::Bind { attr, prop, .. }) => {
            format!("[{}]=\"{}\"", attr, prop)
        }
        (Framework::Html, Attr::Bind { .. }) => return None,

        (Framework::React, Attr::Event { handler, .. }) => format!("{}={{{}}}", handler, handler),
        (Framework::Vue, Attr::Event { dom, handler }) => {
            format!("@{}=\"emit('{}', $event)\"", dom, emitted_name(handler))
        }
        (Framework::Angular, Attr::Event { dom, handler }) => {
            format!("({})=\"{}.emit($event)\"", dom, emitted_name(handler))
        }
        (Framework::Html, Attr::Event { .. }) => return None,
    };
    Some(rendered)
}

fn render_inline(framework: Framework, node: &Node) -> String {
    match node {
        Node::Text(t) => t.to_string(),
        Node::Slot { name, fallback } => match (framework, name) {
            (Framework::Html, _) => fallback.to_string(),
            (Framework::React, None) => "{children}".to_string(),
            (Framework::React, Some(n)) => format!("{{{}}}", n),
            (Framework::Vue, None) => "<slot />".to_string(),
            (Framework::Angular, None) => "<ng-content></ng-content>".to_string(),
            (Framework::Vue | Framework::Angular, Some(n)) => format!("{{{{ {} }}}}", n),
        },
        Node::Element { .. } => {
            let mut out = String::new();
            render_into(framework, node, 0, &mut out);
            out.trim_end().to_string()
        }
    }
}

fn render_into(framework: Framework, node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let Node::Element {
        tag,
        attrs,
        children,
    } = node
    else {
        let _ = writeln!(out, "{}{}", indent, render_inline(framework, node));
        return;
    };

    let attrs: String = attrs
        .iter()
        .filter_map(|a| render_attr(framework, a))
        .map(|a| format!(" {}", a))
        .collect();

    if VOID_TAGS.contains(tag) {
        let close = if framework == Framework::Html { ">" } else { " />" };
        let _ = writeln!(out, "{}<{}{}{}", indent, tag, attrs, close);
        return;
    }

    match children.as_slice() {
        [only] if !matches!(only, Node::Element { .. }) => {
            let _ = writeln!(
                out,
                "{}<{}{}>{}</{}>",
                indent,
                tag,
                attrs,
                render_inline(framework, only),
                tag
            );
        }
        _ => {
            let _ = writeln!(out, "{}<{}{}>", indent, tag, attrs);
            for child in children {
                render_into(framework, child, depth + 1, out);
            }
            let _ = writeln!(out, "{}</{}>", indent, tag);
        }
    }
}

/// Markup for a fragment tree, indented by `depth` levels of two spaces.
pub fn render_markup(framework: Framework, node: &Node, depth: usize) -> String {
    let mut out = String::new();
    render_into(framework, node, depth, &mut out);
    out
}

fn pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn ts_type(ty: PropType) -> &'static str {
    match ty {
        PropType::Bool => "boolean",
        PropType::Text => "string",
    }
}

fn ts_default(ty: PropType) -> &'static str {
    match ty {
        PropType::Bool => "false",
        PropType::Text => "''",
    }
}

fn scaffold_react(name: &str, markup: &str, bindings: &[Binding], imports: bool) -> String {
    let mut out = String::new();
    if imports {
        out.push_str("import React from 'react';\n\n");
    }
    let _ = writeln!(out, "export interface {}Props {{", name);
    let mut params = Vec::new();
    for b in bindings {
        match b {
            Binding::Children => {
                out.push_str("  children?: React.ReactNode;\n");
                params.push("children".to_string());
            }
            Binding::Prop(prop, ty) => {
                let _ = writeln!(out, "  {}?: {};", prop, ts_type(*ty));
                params.push(format!("{} = {}", prop, ts_default(*ty)));
            }
            Binding::Event(_, handler) => {
                let _ = writeln!(out, "  {}?: (event: React.SyntheticEvent) => void;", handler);
                params.push(handler.to_string());
            }
        }
    }
    out.push_str("}\n\n");
    let _ = writeln!(
        out,
        "export function {}({{ {} }}: {}Props) {{",
        name,
        params.join(", "),
        name
    );
    out.push_str("  return (\n");
    out.push_str(markup);
    out.push_str("  );\n}\n\n");
    let _ = writeln!(out, "export default {};", name);
    out
}

fn scaffold_vue(markup: &str, bindings: &[Binding], imports: bool) -> String {
    let mut out = String::from("<template>\n");
    out.push_str(markup);
    out.push_str("</template>\n\n<script setup lang=\"ts\">\n");
    if imports {
        out.push_str("import { defineEmits, defineProps, withDefaults } from 'vue';\n\n");
    }

    let props: Vec<_> = bindings
        .iter()
        .filter_map(|b| match b {
            Binding::Prop(p, ty) => Some((*p, *ty)),
            _ => None,
        })
        .collect();
    let events: Vec<_> = bindings
        .iter()
        .filter_map(|b| match b {
            Binding::Event(_, h) => Some(emitted_name(h)),
            _ => None,
        })
        .collect();

    if !props.is_empty() {
        out.push_str("interface Props {\n");
        for (p, ty) in &props {
            let _ = writeln!(out, "  {}?: {};", p, ts_type(*ty));
        }
        out.push_str("}\n\nwithDefaults(defineProps<Props>(), {\n");
        for (p, ty) in &props {
            let _ = writeln!(out, "  {}: {},", p, ts_default(*ty));
        }
        out.push_str("});\n");
    }
    if !events.is_empty() {
        if !props.is_empty() {
            out.push('\n');
        }
        out.push_str("const emit = defineEmits<{\n");
        for e in &events {
            let _ = writeln!(out, "  {}: [event: Event];", e);
        }
        out.push_str("}>();\n");
    }
    out.push_str("</script>\n");
    out
}

fn scaffold_angular(
    name: &str,
    component: &str,
    markup: &str,
    bindings: &[Binding],
    imports: bool,
) -> String {
    let has_inputs = bindings.iter().any(|b| matches!(b, Binding::Prop(..)));
    let has_outputs = bindings.iter().any(|b| matches!(b, Binding::Event(..)));

    let mut out = String::new();
    if imports {
        let mut symbols = vec!["Component"];
        if has_outputs {
            symbols.push("EventEmitter");
        }
        if has_inputs {
            symbols.push("Input");
        }
        if has_outputs {
            symbols.push("Output");
        }
        let _ = writeln!(
            out,
            "import {{ {} }} from '@angular/core';\n",
            symbols.join(", ")
        );
    }
    out.push_str("@Component({\n");
    let _ = writeln!(out, "  selector: 'app-{}',", component);
    out.push_str("  standalone: true,\n  template: `\n");
    out.push_str(markup);
    out.push_str("  `,\n})\n");
    let _ = writeln!(out, "export class {}Component {{", name);
    for b in bindings {
        match b {
            Binding::Prop(p, ty) => {
                let _ = writeln!(out, "  @Input() {} = {};", p, ts_default(*ty));
            }
            Binding::Event(_, h) => {
                let _ = writeln!(
                    out,
                    "  @Output() {} = new EventEmitter<Event>();",
                    emitted_name(h)
                );
            }
            Binding::Children => {}
        }
    }
    out.push_str("}\n");
    out
}

fn scaffold_html(name: &str, variant: &str, markup: &str, imports: bool) -> String {
    let mut out = String::new();
    if imports {
        out.push_str("<script src=\"https://cdn.tailwindcss.com\"></script>\n\n");
    }
    let _ = writeln!(out, "<!-- {} ({}) -->", name, variant);
    out.push_str(markup);
    out
}

// ═══════════════════════════════════════════════════════════════════════
// Generator
// ═══════════════════════════════════════════════════════════════════════

/// Template metadata, served as `design://templates/{component}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub component: String,
    pub description: String,
    pub variants: Vec<String>,
    pub default_variant: String,
    pub frameworks: Vec<String>,
    pub uri: String,
}

/// Renders templates for the components that have one.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    specs: Vec<ComponentSpec>,
}

impl CodeGenerator {
    /// Keep the specs that have a template, in template order.
    pub fn new(components: &[ComponentSpec]) -> Self {
        let specs = TEMPLATED_COMPONENTS
            .iter()
            .filter_map(|name| components.iter().find(|c| c.name == *name).cloned())
            .filter(|c| !c.variants.is_empty())
            .collect();
        Self { specs }
    }

    pub fn component_names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name.clone()).collect()
    }

    fn resolve(&self, component: &str) -> Option<&ComponentSpec> {
        self.specs.iter().find(|s| s.answers_to(component))
    }

    pub fn template_info(&self, component: &str) -> Option<TemplateInfo> {
        let spec = self.resolve(component)?;
        Some(TemplateInfo {
            component: spec.name.clone(),
            description: format!("Code template for the {} component", spec.name),
            variants: spec.variants.clone(),
            default_variant: spec.variants[0].clone(),
            frameworks: Framework::names(),
            uri: format!("design://templates/{}", spec.name),
        })
    }

    pub fn templates(&self) -> Vec<TemplateInfo> {
        self.specs
            .iter()
            .filter_map(|s| self.template_info(&s.name))
            .collect()
    }

    /// Generate source for one component variant in one framework.
    ///
    /// Components are matched through their aliases. An absent variant means
    /// the component's first (default) variant.
    pub fn generate_component(
        &self,
        component: &str,
        variant: Option<&str>,
        framework: &str,
        include_imports: bool,
    ) -> Result<String> {
        let spec = self.resolve(component);
        let fw = Framework::from_str(framework).ok();
        let (Some(spec), Some(fw)) = (spec, fw) else {
            return Err(DesignError::UnsupportedTarget {
                component: component.to_string(),
                framework: framework.to_string(),
                components: self.component_names(),
                frameworks: Framework::names(),
            });
        };

        let variant = match variant.map(str::trim).filter(|v| !v.is_empty()) {
            None => spec.variants[0].as_str(),
            Some(v) => spec
                .variants
                .iter()
                .find(|known| known.eq_ignore_ascii_case(v))
                .map(String::as_str)
                .ok_or_else(|| {
                    DesignError::invalid_choice(
                        format!("unknown variant '{}' for {}", v, spec.name),
                        &spec.variants,
                    )
                })?,
        };

        let root = template(&spec.name, variant).ok_or_else(|| DesignError::UnsupportedTarget {
            component: component.to_string(),
            framework: framework.to_string(),
            components: self.component_names(),
            frameworks: Framework::names(),
        })?;

        let mut bindings = Vec::new();
        collect_bindings(&root, &mut bindings);
        let name = pascal_case(&spec.name);

        let code = match fw {
            Framework::React => scaffold_react(
                &name,
                &render_markup(fw, &root, 2),
                &bindings,
                include_imports,
            ),
            Framework::Vue => scaffold_vue(&render_markup(fw, &root, 1), &bindings, include_imports),
            Framework::Angular => scaffold_angular(
                &name,
                &spec.name,
                &render_markup(fw, &root, 2),
                &bindings,
                include_imports,
            ),
            Framework::Html => scaffold_html(
                &name,
                variant,
                &render_markup(fw, &root, 0),
                include_imports,
            ),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;

    fn generator() -> CodeGenerator {
        CodeGenerator::new(&Corpus::embedded().unwrap().components)
    }

    #[test]
    fn test_every_template_renders_in_every_framework() {
        let g = generator();
        assert_eq!(g.component_names(), TEMPLATED_COMPONENTS);
        for info in g.templates() {
            for variant in &info.variants {
                for fw in Framework::ALL {
                    let code = g
                        .generate_component(&info.component, Some(variant), fw.as_str(), true)
                        .unwrap();
                    assert!(!code.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        let g = generator();
        let a = g.generate_component("modal", Some("large"), "angular", true).unwrap();
        let b = g.generate_component("modal", Some("large"), "angular", true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_react_button() {
        let code = generator()
            .generate_component("button", Some("primary"), "react", true)
            .unwrap();
        assert!(code.starts_with("import React from 'react';"));
        assert!(code.contains("export function Button({ disabled = false, onClick, children }"));
        assert!(code.contains("className=\"inline-flex"));
        assert!(code.contains("bg-blue-600"));
        assert!(code.contains("onClick={onClick}"));
        assert!(code.contains("disabled={disabled}"));
        assert!(code.contains(">{children}</button>"));
    }

    #[test]
    fn test_vue_and_angular_bindings() {
        let g = generator();
        let vue = g.generate_component("input", Some("error"), "vue", true).unwrap();
        assert!(vue.starts_with("<template>"));
        assert!(vue.contains(":placeholder=\"placeholder\""));
        assert!(vue.contains("@input=\"emit('change', $event)\""));
        assert!(vue.contains("aria-invalid=\"true\""));
        assert!(vue.contains("{{ message }}"));

        let ng = g.generate_component("card", None, "angular", true).unwrap();
        assert!(ng.starts_with("import { Component, Input } from '@angular/core';"));
        assert!(ng.contains("selector: 'app-card'"));
        assert!(ng.contains("<ng-content></ng-content>"));
        assert!(ng.contains("@Input() title = '';"));
    }

    #[test]
    fn test_html_has_no_bindings() {
        let html = generator()
            .generate_component("badge", Some("success"), "html", false)
            .unwrap();
        assert!(html.starts_with("<!-- Badge (success) -->"));
        assert!(html.contains("class=\"inline-flex"));
        assert!(html.contains("bg-green-100"));
        assert!(!html.contains('{'));
    }

    #[test]
    fn test_include_imports_toggles_preamble() {
        let g = generator();
        let with = g.generate_component("alert", None, "react", true).unwrap();
        let without = g.generate_component("alert", None, "react", false).unwrap();
        assert!(with.contains("import React"));
        assert!(!without.contains("import React"));
        assert!(with.ends_with(&without));
    }

    #[test]
    fn test_default_variant_and_aliases() {
        let g = generator();
        let default = g.generate_component("btn", None, "html", false).unwrap();
        let primary = g.generate_component("button", Some("primary"), "html", false).unwrap();
        assert_eq!(default, primary);
    }

    #[test]
    fn test_unknown_variant_lists_variants() {
        let err = generator()
            .generate_component("button", Some("huge"), "react", true)
            .unwrap_err();
        assert_eq!(err.code(), "invalid_argument");
        let body = err.to_json();
        assert_eq!(body["validValues"][0], "primary");
    }

    #[test]
    fn test_unsupported_targets() {
        let g = generator();
        let err = g.generate_component("button", None, "svelte", true).unwrap_err();
        assert_eq!(err.code(), "unsupported_target");
        let err = g.generate_component("tooltip", None, "react", true).unwrap_err();
        assert_eq!(err.code(), "unsupported_target");
        let body = err.to_json();
        assert_eq!(body["supportedFrameworks"].as_array().unwrap().len(), 4);
    }
}
