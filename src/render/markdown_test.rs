/// Tests for the Markdown report renderer
///
/// These cover the degrade path, the competitor analysis layout, and the
/// generic walk for unrecognized result shapes.

#[cfg(test)]
mod tests {
    use crate::render::markdown::*;
    use crate::tree::ReportNode;

    fn render(result_text: &str, title: &str) -> String {
        render_markdown(&ReportNode::from_result_text(result_text), title)
    }

    #[test]
    fn test_raw_text_keeps_header_body_and_footer() {
        let md = render("texto solto, definitivamente não é { json", "Análise Rápida");

        assert!(md.starts_with("# Análise Rápida\n"));
        assert!(md.contains("**Data:** "));
        assert!(md.contains("**Gerado por:** Kalu AI Assistant ⚡"));
        assert!(md.contains("## Resultado\n\ntexto solto, definitivamente não é { json\n"));
        assert!(md.ends_with("*Relatório gerado automaticamente por Kalu AI Assistant*\n"));
    }

    #[test]
    fn test_empty_input_still_renders_a_document() {
        let md = render("", "Vazio");
        assert!(md.contains("## Resultado"));
        assert!(md.ends_with("*Relatório gerado automaticamente por Kalu AI Assistant*\n"));
    }

    #[test]
    fn test_competitor_analysis_sections_in_fixed_order() {
        let result = r#"{
            "analise_concorrentes": {
                "proximos_passos": ["Validar preços", "Lançar piloto"],
                "conclusao": "Mercado promissor",
                "mercado": "Luanda",
                "segmento": "Restauração",
                "data": "2026-02-12",
                "concorrentes_locais": [
                    {"nome": "Sabor Local", "tipo": "Restaurante", "publico": "Famílias",
                     "faixa_preco": "5.000-12.000 Kz", "diferencial": "Entrega rápida"}
                ],
                "concorrentes_internacionais": [
                    {"nome": "GlobalEats", "tipo": "Plataforma", "diferencial": "Escala"}
                ],
                "analise_precos": {
                    "mercado_local": {"economico": "3.000 Kz", "premium": "15.000 Kz"},
                    "observacoes": "Preços sensíveis à logística"
                },
                "publico_alvo_identificado": {
                    "primario": "Jovens profissionais",
                    "secundario": "Empresas",
                    "valores": ["conveniência", "qualidade"]
                },
                "oportunidades_linha_corpo": [
                    {"area": "Delivery noturno", "detalhe": "Pouca oferta depois das 22h"}
                ],
                "ameacas": [
                    {"ameaca": "Novos entrantes", "mitigacao": "Fidelização"}
                ],
                "recomendacoes": [
                    {"acao": "Negociar logística", "prioridade": "Alta", "justificativa": "Custo dominante"}
                ],
                "faixa_preco_sugerida": {
                    "economico": "4.000 Kz",
                    "premium": "14.000 Kz",
                    "justificativa": "Margem confortável"
                }
            }
        }"#;
        let md = render(result, "Análise de Concorrentes");

        let order = [
            "## 📊 Informações Gerais",
            "## 🏢 Concorrentes Locais",
            "## 🌍 Concorrentes Internacionais",
            "## 💰 Análise de Preços",
            "## 🎯 Público-Alvo Identificado",
            "## ✅ Oportunidades",
            "## ⚠️ Ameaças e Mitigação",
            "## 📋 Recomendações",
            "## 💵 Faixa de Preço Sugerida",
            "## 🎯 Conclusão",
            "## 📌 Próximos Passos",
        ];
        let mut last = 0;
        for heading in order {
            let pos = md.find(heading).unwrap_or_else(|| panic!("missing {}", heading));
            assert!(pos >= last, "{} rendered out of order", heading);
            last = pos;
        }

        assert!(md.contains("- **Mercado:** Luanda\n"));
        assert!(md.contains("### Sabor Local\n"));
        assert!(md.contains("- **Faixa de Preço:** 5.000-12.000 Kz\n"));
        assert!(md.contains("**Mercado Local:**\n\n- **Economico:** 3.000 Kz\n"));
        assert!(md.contains("**Observações:** Preços sensíveis à logística\n"));
        assert!(md.contains("- **Valores:** conveniência, qualidade\n"));
        assert!(md.contains("### Delivery noturno\nPouca oferta depois das 22h\n"));
        assert!(md.contains("- **Ameaça:** Novos entrantes\n  - **Mitigação:** Fidelização\n"));
        assert!(md.contains("\n**Justificativa:** Margem confortável\n"));
        assert!(md.contains("## 🎯 Conclusão\n\nMercado promissor\n"));
        assert!(md.contains("1. Validar preços\n2. Lançar piloto\n"));
    }

    #[test]
    fn test_competitor_analysis_missing_fields_fall_back_to_na() {
        let md = render(r#"{"analise_concorrentes": {"concorrentes_locais": [{}]}}"#, "Análise");

        assert!(md.contains("- **Mercado:** N/A\n"));
        assert!(md.contains("- **Segmento:** N/A\n"));
        assert!(md.contains("- **Data da Análise:** N/A\n"));
        assert!(md.contains("### N/A\n"));
        assert!(md.contains("- **Tipo:** N/A\n"));
    }

    #[test]
    fn test_priority_marker_mapping() {
        assert_eq!(PriorityMarker::from_label("Alta").as_str(), "🔴");
        assert_eq!(PriorityMarker::from_label("Média").as_str(), "🟡");
        assert_eq!(PriorityMarker::from_label("Baixa").as_str(), "🟢");
        assert_eq!(PriorityMarker::from_label("qualquer outra").as_str(), "🟢");
    }

    #[test]
    fn test_recommendation_headings_carry_markers() {
        let result = r#"{"analise_concorrentes": {"recomendacoes": [
            {"acao": "Agir já", "prioridade": "Alta"},
            {"acao": "Observar"}
        ]}}"#;
        let md = render(result, "Análise");

        assert!(md.contains("### 🔴 Agir já\n- **Prioridade:** Alta\n"));
        // Missing priority defaults to Média.
        assert!(md.contains("### 🟡 Observar\n- **Prioridade:** Média\n"));
        assert!(md.contains("- **Justificativa:** N/A\n"));
    }

    #[test]
    fn test_generic_walk_renders_structured_sections() {
        let md = render(r#"{"resumo": {"titulo": "X", "items": ["a", "b"]}}"#, "Report");

        assert!(md.contains("## Resumo\n"));
        assert!(md.contains("- **Titulo:** X\n"));
        assert!(md.contains("### Items\n\n- a\n- b\n"));
    }

    #[test]
    fn test_generic_walk_scalar_and_list_sections() {
        let md = render(
            r#"{"status": "completo", "etapas": ["um", "dois"], "total_horas": 12}"#,
            "Execução",
        );

        assert!(md.contains("## Status\n\ncompleto\n"));
        assert!(md.contains("## Etapas\n\n- um\n- dois\n"));
        assert!(md.contains("## Total Horas\n\n12\n"));
    }

    #[test]
    fn test_generic_walk_sequence_of_mappings_renders_bullet_groups() {
        let md = render(
            r#"{"equipas": [
                {"nome": "Alfa", "tamanho": 3},
                {"nome": "Beta", "tamanho": 5}
            ]}"#,
            "Equipas",
        );

        assert!(md.contains("- **Nome:** Alfa\n- **Tamanho:** 3\n\n"));
        assert!(md.contains("- **Nome:** Beta\n- **Tamanho:** 5\n"));
    }

    #[test]
    fn test_generic_walk_collapses_deep_nesting_to_json() {
        let md = render(
            r#"{"plano": {"titulo": "P", "fases": [{"nome": "f1"}]}}"#,
            "Plano",
        );

        assert!(md.contains("- **Titulo:** P\n"));
        assert!(md.contains("### Fases\n\n```json\n"));
        assert!(md.contains("\"nome\": \"f1\""));
    }

    #[test]
    fn test_sequence_root_dumps_pretty_json() {
        let md = render(r#"[1, 2, 3]"#, "Lista");

        assert!(md.contains("## 📄 Resultado\n\n```json\n"));
        assert!(md.contains("1,\n"));
        assert!(md.ends_with("*Relatório gerado automaticamente por Kalu AI Assistant*\n"));
    }
}
