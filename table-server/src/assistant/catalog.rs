//! 菜单目录
//!
//! 购物车只接受目录中存在的菜品。

use shared::models::MenuItem;

#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn get(&self, menu_id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == menu_id)
    }

    /// 按声明顺序
    pub fn list(&self) -> &[MenuItem] {
        &self.items
    }

    /// 分类 (首次出现顺序)
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    /// 顾客可读的菜单文本
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .items
            .iter()
            .map(|item| {
                format!(
                    "🍽️ **{}** - {}원\n   {}",
                    item.name,
                    format_won(item.price),
                    item.description
                )
            })
            .collect();
        format!(
            "📋 **메뉴판**\n\n{}\n\n💬 원하시는 메뉴를 말씀해주세요!",
            lines.join("\n\n")
        )
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::new(vec![
            item(
                "pasta_01",
                "토마토 파스타",
                12000,
                "신선한 토마토와 바질로 만든 파스타",
                "main",
                &["글루텐"],
            ),
            item(
                "pizza_01",
                "마르게리타 피자",
                18000,
                "모짜렐라 치즈와 바질의 클래식 피자",
                "main",
                &["글루텐", "유제품"],
            ),
            item("drink_01", "콜라", 3000, "시원한 탄산음료", "drink", &[]),
            item("drink_02", "생수", 2000, "깔끔한 생수", "drink", &[]),
        ])
    }
}

fn item(
    id: &str,
    name: &str,
    price: i64,
    description: &str,
    category: &str,
    allergens: &[&str],
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: description.to_string(),
        category: category.to_string(),
        allergens: allergens.iter().map(|a| a.to_string()).collect(),
    }
}

/// 千位分隔 (12000 → "12,000")
pub fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = MenuCatalog::default();
        assert_eq!(catalog.list().len(), 4);
        assert_eq!(catalog.get("pasta_01").unwrap().price, 12000);
        assert_eq!(catalog.get("pizza_01").unwrap().allergens.len(), 2);
        assert!(catalog.get("steak_01").is_none());
        assert_eq!(catalog.categories(), vec!["main", "drink"]);
    }

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(0), "0");
        assert_eq!(format_won(900), "900");
        assert_eq!(format_won(12000), "12,000");
        assert_eq!(format_won(1234567), "1,234,567");
    }

    #[test]
    fn test_render_lists_every_item() {
        let text = MenuCatalog::default().render();
        assert!(text.contains("토마토 파스타"));
        assert!(text.contains("18,000원"));
        assert!(text.contains("생수"));
    }
}
