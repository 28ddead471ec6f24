//! 助手意图
//!
//! 助手后端只返回文本；意图由 [`IntentParser`] 从文本中提取，
//! 由编排层执行。后端永远不会直接修改会话状态。

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// 结构化意图，序列化为 `{name, arguments}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum Intent {
    ShowMenu,
    AddToCart {
        #[serde(rename = "menuId")]
        menu_id: String,
        quantity: i64,
    },
    GetCart,
    CompleteOrder,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShowMenu => "show_menu",
            Self::AddToCart { .. } => "add_to_cart",
            Self::GetCart => "get_cart",
            Self::CompleteOrder => "complete_order",
        }
    }
}

/// 文本 → 意图序列 (纯函数)
pub trait IntentParser: Send + Sync {
    fn parse(&self, text: &str) -> Vec<Intent>;
}

/// 关键词匹配解析器
///
/// 顺序固定：菜单 → 加入购物车 (按出现顺序) → 查看购物车 → 完成订单。
#[derive(Debug, Clone)]
pub struct KeywordIntentParser {
    show_menu: Regex,
    add_item: Regex,
    get_cart: Regex,
    complete_order: Regex,
}

impl KeywordIntentParser {
    pub fn new() -> Result<Self, regex::Error> {
        let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();
        Ok(Self {
            show_menu: build(r"메뉴|menu|보여")?,
            add_item: build(r"(파스타|피자|콜라|음료)\s*(\d*)\s*개?")?,
            get_cart: build(r"장바구니|카트|cart|확인")?,
            complete_order: build(r"주문.*완료|결제|order.*complete")?,
        })
    }

    fn menu_id_for(keyword: &str) -> &'static str {
        match keyword {
            "피자" => "pizza_01",
            "콜라" | "음료" => "drink_01",
            _ => "pasta_01",
        }
    }
}

impl IntentParser for KeywordIntentParser {
    fn parse(&self, text: &str) -> Vec<Intent> {
        let mut intents = Vec::new();

        if self.show_menu.is_match(text) {
            intents.push(Intent::ShowMenu);
        }

        for caps in self.add_item.captures_iter(text) {
            let keyword = caps.get(1).map_or("", |m| m.as_str());
            // Missing or zero quantity means one
            let quantity = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .filter(|q| *q > 0)
                .unwrap_or(1);
            intents.push(Intent::AddToCart {
                menu_id: Self::menu_id_for(keyword).to_string(),
                quantity,
            });
        }

        if self.get_cart.is_match(text) {
            intents.push(Intent::GetCart);
        }

        if self.complete_order.is_match(text) {
            intents.push(Intent::CompleteOrder);
        }

        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> KeywordIntentParser {
        KeywordIntentParser::new().unwrap()
    }

    #[test]
    fn test_plain_text_has_no_intents() {
        assert!(parser().parse("안녕하세요! 반갑습니다.").is_empty());
    }

    #[test]
    fn test_add_with_quantity() {
        let intents = parser().parse("피자 2개 준비해 드릴게요");
        assert_eq!(
            intents,
            vec![Intent::AddToCart {
                menu_id: "pizza_01".into(),
                quantity: 2
            }]
        );
    }

    #[test]
    fn test_multiple_items_in_order() {
        let intents = parser().parse("파스타 하나와 콜라 3개 추가합니다");
        assert_eq!(
            intents,
            vec![
                Intent::AddToCart {
                    menu_id: "pasta_01".into(),
                    quantity: 1
                },
                Intent::AddToCart {
                    menu_id: "drink_01".into(),
                    quantity: 3
                },
            ]
        );
    }

    #[test]
    fn test_fixed_intent_order() {
        let intents = parser().parse("결제 전에 장바구니 확인하시고 메뉴도 보세요");
        let names: Vec<&str> = intents.iter().map(Intent::name).collect();
        assert_eq!(names, vec!["show_menu", "get_cart", "complete_order"]);
    }

    #[test]
    fn test_case_insensitive_english() {
        let intents = parser().parse("Here is the MENU. Your ORDER is COMPLETE.");
        assert_eq!(intents, vec![Intent::ShowMenu, Intent::CompleteOrder]);
    }

    #[test]
    fn test_intent_wire_shape() {
        let json = serde_json::to_value(Intent::AddToCart {
            menu_id: "pasta_01".into(),
            quantity: 2,
        })
        .unwrap();
        assert_eq!(json["name"], "add_to_cart");
        assert_eq!(json["arguments"]["menuId"], "pasta_01");
        assert_eq!(json["arguments"]["quantity"], 2);

        let json = serde_json::to_value(Intent::GetCart).unwrap();
        assert_eq!(json["name"], "get_cart");
    }
}
