use crate::{items::{items_table, ItemsLayout, LineItem}, placeholder::{PlaceholderMap, TOKEN_CLOSE, TOKEN_OPEN}};

/// Row spacing used by the built-in dataset.
pub const SAMPLE_LAYOUT: ItemsLayout = ItemsLayout { start_bottom: 530.58, row_height: 27.6 };

pub fn sample_items() -> Vec<LineItem> {
    vec![
        LineItem::new("Produto Teste 1", 1, 50.0),
        LineItem::new("Produto Teste 2", 1, 50.0),
    ]
}

/// Fake customer and totals used to preview the receipt.
pub fn sample_data() -> PlaceholderMap {
    let fields = [
        ("nome_cliente", "João da Silva"),
        ("endereco_linha_1", "Rua das Flores, 123"),
        ("endereco_linha_2", "Bairro Feliz, Cidade - UF"),
        ("endereco_linha_3", "CEP 12345-678"),
        ("endereco_linha_4", ""),
        ("telefone_cliente", "(11) 99999-9999"),
        ("data", "06/12/2025"),
        ("data_emissao", "06/12/2025"),
        ("numero_recibo", "000001"),
        ("subtotal", "R$ 100,00"),
        ("desconto", "R$ 0,00"),
        ("valor_total", "R$ 100,00"),
        ("metodo_pagamento", "Dinheiro"),
        ("entrada", "R$ 100,00"),
        ("parcelamento", "À vista"),
    ];
    let mut map = PlaceholderMap::new();
    for (name, value) in fields {
        map.put_token(format!("{TOKEN_OPEN}{name}{TOKEN_CLOSE}"), value.to_string());
    }
    map.put_token(
        "{{itens_tabela}}".to_string(),
        items_table(&sample_items(), &SAMPLE_LAYOUT),
    );
    map
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sample_has_all_fields() {
        let data = sample_data();
        assert_eq!(data.len(), 16);
        assert_eq!(data.get("nome_cliente"), Some("João da Silva"));
        assert_eq!(data.get("endereco_linha_4"), Some(""));
        assert!(data.collisions().is_empty());
        let tokens: Vec<_> = data.iter().map(|(t, _)| t).take(2).collect();
        assert_eq!(tokens, vec!["{{nome_cliente}}", "{{endereco_linha_1}}"]);
    }

    #[test]
    fn sample_rows() {
        let data = sample_data();
        let table = data.get("itens_tabela").unwrap();
        assert!(table.contains(r#"style="bottom: 530.58px">Produto Teste 1</div>"#));
        assert!(table.contains(r#"style="bottom: 502.98px">Produto Teste 2</div>"#));
        assert_eq!(table.matches("R$ 50,00").count(), 4);
    }
}
