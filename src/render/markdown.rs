//! Markdown report rendering.
//!
//! Builds the Markdown document every other artifact derives from: a title
//! header with generation timestamp, a body chosen by the shape of the
//! report tree, and the generator footer.
//!
//! Body selection:
//! - raw scalar (input that never parsed as JSON) -> verbatim under a
//!   generic result heading
//! - recognized competitor analysis -> the specialized section layout
//! - any other mapping -> generic walk, one `##` section per root key
//! - anything else -> pretty-printed JSON dump

use chrono::Local;

use crate::tree::{KnownSection, ReportNode, Scalar, SequenceShape, capitalize, display_key};

/// Product name stamped into headers and footers.
pub const GENERATOR_NAME: &str = "Kalu AI Assistant";

/// Timestamp format of the generation stamp ("Data:" line), shared with the
/// office exporters.
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Traffic-light marker for recommendation priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityMarker {
    /// Alta: 🔴
    High,
    /// Média: 🟡
    Medium,
    /// Everything else: 🟢
    Low,
}

impl PriorityMarker {
    /// Map a priority label to its marker.
    pub fn from_label(label: &str) -> PriorityMarker {
        match label {
            "Alta" => PriorityMarker::High,
            "Média" => PriorityMarker::Medium,
            _ => PriorityMarker::Low,
        }
    }

    /// Get the emoji for this marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityMarker::High => "🔴",
            PriorityMarker::Medium => "🟡",
            PriorityMarker::Low => "🟢",
        }
    }
}

/// Render the full Markdown report for a normalized tree. Total: every tree
/// shape has a rendering, so raw or malformed results still produce a
/// document.
pub fn render_markdown(tree: &ReportNode, title: &str) -> String {
    let mut md = String::new();
    push_header(&mut md, title);

    match tree {
        ReportNode::Scalar(scalar) => {
            md.push_str(&format!("## Resultado\n\n{}\n", scalar.display()));
        }
        ReportNode::Section(section) => push_competitor_analysis(&mut md, section),
        ReportNode::Mapping(fields) => push_generic_sections(&mut md, fields),
        ReportNode::Sequence(_) => push_json_dump(&mut md, tree),
    }

    push_footer(&mut md);
    md
}

fn push_header(md: &mut String, title: &str) {
    md.push_str(&format!("# {}\n\n", title));
    md.push_str(&format!("**Data:** {}  \n", Local::now().format(REPORT_DATE_FORMAT)));
    md.push_str(&format!("**Gerado por:** {} ⚡\n\n", GENERATOR_NAME));
    md.push_str("---\n\n");
}

fn push_footer(md: &mut String) {
    md.push_str("\n---\n\n");
    md.push_str(&format!("*Relatório gerado automaticamente por {}*\n", GENERATOR_NAME));
}

/// Scalar field text, or the "N/A" placeholder.
fn display_or_na(node: Option<&ReportNode>) -> String {
    node.and_then(ReportNode::as_scalar).map(Scalar::display).unwrap_or_else(|| "N/A".to_string())
}

/// The competitor analysis layout. Sections render in a fixed order; only
/// the general info block is unconditional.
fn push_competitor_analysis(md: &mut String, section: &KnownSection) {
    md.push_str("## 📊 Informações Gerais\n\n");
    md.push_str(&format!("- **Mercado:** {}\n", display_or_na(section.field("mercado"))));
    md.push_str(&format!("- **Segmento:** {}\n", display_or_na(section.field("segmento"))));
    md.push_str(&format!("- **Data da Análise:** {}\n\n", display_or_na(section.field("data"))));

    if let Some(ReportNode::Sequence(items)) = section.field("concorrentes_locais") {
        md.push_str("## 🏢 Concorrentes Locais\n\n");
        for item in items {
            md.push_str(&format!("### {}\n\n", display_or_na(item.field("nome"))));
            md.push_str(&format!("- **Tipo:** {}\n", display_or_na(item.field("tipo"))));
            md.push_str(&format!("- **Público:** {}\n", display_or_na(item.field("publico"))));
            md.push_str(&format!(
                "- **Faixa de Preço:** {}\n",
                display_or_na(item.field("faixa_preco"))
            ));
            md.push_str(&format!(
                "- **Diferencial:** {}\n\n",
                display_or_na(item.field("diferencial"))
            ));
        }
    }

    if let Some(ReportNode::Sequence(items)) = section.field("concorrentes_internacionais") {
        md.push_str("## 🌍 Concorrentes Internacionais\n\n");
        for item in items {
            md.push_str(&format!("### {}\n\n", display_or_na(item.field("nome"))));
            md.push_str(&format!("- **Tipo:** {}\n", display_or_na(item.field("tipo"))));
            md.push_str(&format!(
                "- **Diferencial:** {}\n\n",
                display_or_na(item.field("diferencial"))
            ));
        }
    }

    if let Some(precos) = section.field("analise_precos") {
        md.push_str("## 💰 Análise de Preços\n\n");
        if let Some(ReportNode::Mapping(bands)) = precos.field("mercado_local") {
            md.push_str("**Mercado Local:**\n\n");
            for (band, value) in bands {
                md.push_str(&format!("- **{}:** {}\n", capitalize(band), value.display_or_json()));
            }
            md.push('\n');
        }
        if let Some(notes) = precos.field_display("observacoes") {
            md.push_str(&format!("**Observações:** {}\n\n", notes));
        }
    }

    if let Some(publico) = section.field("publico_alvo_identificado") {
        md.push_str("## 🎯 Público-Alvo Identificado\n\n");
        md.push_str(&format!("- **Primário:** {}\n", display_or_na(publico.field("primario"))));
        md.push_str(&format!("- **Secundário:** {}\n", display_or_na(publico.field("secundario"))));
        if let Some(ReportNode::Sequence(values)) = publico.field("valores") {
            let joined =
                values.iter().map(ReportNode::display_or_json).collect::<Vec<_>>().join(", ");
            md.push_str(&format!("- **Valores:** {}\n", joined));
        }
        md.push('\n');
    }

    if let Some(ReportNode::Sequence(items)) = section.field("oportunidades_linha_corpo") {
        md.push_str("## ✅ Oportunidades\n\n");
        for item in items {
            md.push_str(&format!("### {}\n", display_or_na(item.field("area"))));
            md.push_str(&format!("{}\n\n", display_or_na(item.field("detalhe"))));
        }
    }

    if let Some(ReportNode::Sequence(items)) = section.field("ameacas") {
        md.push_str("## ⚠️ Ameaças e Mitigação\n\n");
        for item in items {
            md.push_str(&format!("- **Ameaça:** {}\n", display_or_na(item.field("ameaca"))));
            md.push_str(&format!(
                "  - **Mitigação:** {}\n\n",
                display_or_na(item.field("mitigacao"))
            ));
        }
    }

    if let Some(ReportNode::Sequence(items)) = section.field("recomendacoes") {
        md.push_str("## 📋 Recomendações\n\n");
        for item in items {
            let priority = item.field_display("prioridade").unwrap_or_else(|| "Média".to_string());
            let marker = PriorityMarker::from_label(&priority);
            md.push_str(&format!(
                "### {} {}\n",
                marker.as_str(),
                display_or_na(item.field("acao"))
            ));
            md.push_str(&format!("- **Prioridade:** {}\n", priority));
            md.push_str(&format!(
                "- **Justificativa:** {}\n\n",
                display_or_na(item.field("justificativa"))
            ));
        }
    }

    if let Some(ReportNode::Mapping(bands)) = section.field("faixa_preco_sugerida") {
        md.push_str("## 💵 Faixa de Preço Sugerida\n\n");
        for (band, value) in bands {
            if band != "justificativa" {
                md.push_str(&format!("- **{}:** {}\n", capitalize(band), value.display_or_json()));
            }
        }
        if let Some((_, value)) = bands.iter().find(|(k, _)| k == "justificativa") {
            md.push_str(&format!("\n**Justificativa:** {}\n\n", value.display_or_json()));
        }
    }

    if let Some(conclusion) = section.field("conclusao") {
        md.push_str("## 🎯 Conclusão\n\n");
        md.push_str(&format!("{}\n\n", conclusion.display_or_json()));
    }

    if let Some(ReportNode::Sequence(steps)) = section.field("proximos_passos") {
        md.push_str("## 📌 Próximos Passos\n\n");
        for (i, step) in steps.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, step.display_or_json()));
        }
    }
}

/// Generic walk for unrecognized mapping roots: one `##` section per root
/// key, fields as bold-label bullets, scalar lists as bullets, anything
/// deeper as a JSON block.
fn push_generic_sections(md: &mut String, fields: &[(String, ReportNode)]) {
    for (key, value) in fields {
        md.push_str(&format!("## {}\n\n", display_key(key)));
        match value {
            ReportNode::Scalar(scalar) => md.push_str(&format!("{}\n\n", scalar.display())),
            ReportNode::Sequence(items) => push_sequence_block(md, items),
            ReportNode::Mapping(inner) => push_mapping_block(md, inner),
            ReportNode::Section(section) => push_mapping_block(md, &section.fields),
        }
    }
}

fn push_sequence_block(md: &mut String, items: &[ReportNode]) {
    match SequenceShape::of(items) {
        SequenceShape::Empty => md.push('\n'),
        SequenceShape::Mappings => {
            // One bullet group per item, blank line between items.
            for item in items {
                if let ReportNode::Mapping(pairs) = item {
                    for (key, value) in pairs {
                        md.push_str(&format!(
                            "- **{}:** {}\n",
                            display_key(key),
                            value.display_or_json()
                        ));
                    }
                    md.push('\n');
                } else {
                    md.push_str(&format!("- {}\n\n", item.display_or_json()));
                }
            }
        }
        SequenceShape::Scalars => {
            for item in items {
                md.push_str(&format!("- {}\n", item.display_or_json()));
            }
            md.push('\n');
        }
    }
}

fn push_mapping_block(md: &mut String, fields: &[(String, ReportNode)]) {
    let mut in_bullets = false;
    for (key, value) in fields {
        match value {
            ReportNode::Scalar(scalar) => {
                md.push_str(&format!("- **{}:** {}\n", display_key(key), scalar.display()));
                in_bullets = true;
            }
            ReportNode::Sequence(items)
                if SequenceShape::of(items) != SequenceShape::Mappings =>
            {
                if in_bullets {
                    md.push('\n');
                    in_bullets = false;
                }
                md.push_str(&format!("### {}\n\n", display_key(key)));
                for item in items {
                    md.push_str(&format!("- {}\n", item.display_or_json()));
                }
                md.push('\n');
            }
            nested => {
                // One structured level only; deeper shapes become a blob.
                if in_bullets {
                    md.push('\n');
                    in_bullets = false;
                }
                md.push_str(&format!("### {}\n\n", display_key(key)));
                md.push_str("```json\n");
                md.push_str(&nested.to_pretty_json());
                md.push_str("\n```\n\n");
            }
        }
    }
    if in_bullets {
        md.push('\n');
    }
}

fn push_json_dump(md: &mut String, tree: &ReportNode) {
    md.push_str("## 📄 Resultado\n\n");
    md.push_str("```json\n");
    md.push_str(&tree.to_pretty_json());
    md.push_str("\n```\n");
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod markdown_test;
