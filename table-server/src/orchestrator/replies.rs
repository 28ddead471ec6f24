//! 面向顾客的回复文本

use super::{CartView, OrderReceipt};
use crate::assistant::format_won;
use crate::core::SessionError;

/// 助手后端不可用时的致歉文本
pub const APOLOGY_MESSAGE: &str =
    "죄송합니다. 일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요. 😅";

/// 预计制作时间
pub const ESTIMATED_TIME: &str = "15-20분";

pub fn item_added(name: &str, quantity: i64) -> String {
    format!("{} {}개를 장바구니에 추가했습니다! 🛒", name, quantity)
}

pub fn cart_summary(view: &CartView) -> String {
    if view.cart.is_empty() {
        return "🛒 장바구니가 비어있습니다.\n메뉴를 주문해보세요!".to_string();
    }
    let lines: Vec<String> = view
        .cart
        .iter()
        .map(|line| {
            format!(
                "• {} x{} = {}원",
                line.name,
                line.quantity,
                format_won(line.line_total())
            )
        })
        .collect();
    format!(
        "🛒 **현재 주문 내역**\n\n{}\n\n💰 **총 금액: {}원**",
        lines.join("\n"),
        format_won(view.total_amount)
    )
}

pub fn order_completed(receipt: &OrderReceipt) -> String {
    format!(
        "✅ **주문이 완료되었습니다!**\n\n📝 주문번호: {}\n🍳 주방에서 조리를 시작합니다.\n⏱️ 예상 조리시간: {}",
        receipt.order_id, receipt.estimated_time
    )
}

/// 意图执行失败时替换回复的文本
pub fn for_error(err: &SessionError) -> String {
    match err {
        SessionError::UnknownMenuItem(_) => "죄송합니다. 해당 메뉴를 찾을 수 없습니다.".to_string(),
        SessionError::EmptyCartCompletion => {
            "주문할 메뉴가 없습니다. 먼저 메뉴를 선택해주세요! 😊".to_string()
        }
        SessionError::InvalidTransition { .. } => {
            "이미 주문이 접수되었습니다. 추가 주문은 메뉴를 다시 담아주세요.".to_string()
        }
        SessionError::InvalidQuantity(_) => "수량을 다시 확인해주세요.".to_string(),
        _ => APOLOGY_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CartLine;

    #[test]
    fn test_cart_summary() {
        let view = CartView {
            table_id: "4".into(),
            cart: vec![CartLine {
                menu_id: "pasta_01".into(),
                name: "토마토 파스타".into(),
                price: 12000,
                quantity: 3,
                category: "main".into(),
            }],
            total_amount: 36000,
            item_count: 3,
            last_updated: None,
        };
        let text = cart_summary(&view);
        assert!(text.contains("토마토 파스타 x3 = 36,000원"));
        assert!(text.contains("총 금액: 36,000원"));
    }

    #[test]
    fn test_empty_cart_summary() {
        let view = CartView {
            table_id: "4".into(),
            cart: vec![],
            total_amount: 0,
            item_count: 0,
            last_updated: None,
        };
        assert!(cart_summary(&view).contains("비어있습니다"));
    }
}
