//! 购物车账本
//!
//! 每个菜品最多一行，重复加入累加数量；数量为 0 的行在重算时被移除。
//! 总额始终由购物车行重新计算，不单独维护。

use shared::models::{CartLine, MenuItem, TableSession};

/// 购物车操作错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),
}

/// 加入菜品
///
/// 已存在同一 `menu_id` 的行时累加数量，否则追加新行。
/// 非正数量或累加后超出 `u32` 范围直接拒绝，不修改会话。
pub fn add_item(session: &mut TableSession, item: &MenuItem, quantity: i64) -> Result<(), CartError> {
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(CartError::InvalidQuantity(quantity))?;

    if let Some(existing) = session.cart.iter_mut().find(|line| line.menu_id == item.id) {
        existing.quantity = existing
            .quantity
            .checked_add(quantity)
            .ok_or(CartError::InvalidQuantity(i64::from(quantity)))?;
    } else {
        session.cart.push(CartLine {
            menu_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity,
            category: item.category.clone(),
        });
    }

    recalculate_total(session);
    Ok(())
}

/// 购物车只读快照 (保持加入顺序)
pub fn snapshot(session: &TableSession) -> Vec<CartLine> {
    session.cart.clone()
}

/// 清空购物车并将总额归零
pub fn clear(session: &mut TableSession) {
    session.cart.clear();
    session.total_amount = 0;
}

/// 按 `price × quantity` 重新计算总额
pub fn recalculate_total(session: &mut TableSession) {
    session.cart.retain(|line| line.quantity > 0);
    session.total_amount = session.cart.iter().map(CartLine::line_total).sum();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item(id: &str, name: &str, price: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            description: String::new(),
            category: "main".to_string(),
            allergens: vec![],
        }
    }

    #[test]
    fn test_add_new_line() {
        let mut session = TableSession::new("4");
        let pasta = menu_item("pasta_01", "토마토 파스타", 12000);

        add_item(&mut session, &pasta, 1).unwrap();

        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.total_amount, 12000);
    }

    #[test]
    fn test_repeat_add_merges_quantity() {
        let mut session = TableSession::new("4");
        let pasta = menu_item("pasta_01", "토마토 파스타", 12000);

        add_item(&mut session, &pasta, 1).unwrap();
        add_item(&mut session, &pasta, 2).unwrap();

        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.cart[0].quantity, 3);
        assert_eq!(session.total_amount, 36000);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut session = TableSession::new("1");
        add_item(&mut session, &menu_item("pizza_01", "피자", 18000), 1).unwrap();
        add_item(&mut session, &menu_item("drink_01", "콜라", 3000), 2).unwrap();
        add_item(&mut session, &menu_item("pizza_01", "피자", 18000), 1).unwrap();

        let ids: Vec<_> = snapshot(&session).into_iter().map(|l| l.menu_id).collect();
        assert_eq!(ids, vec!["pizza_01", "drink_01"]);
        assert_eq!(session.total_amount, 18000 * 2 + 3000 * 2);
    }

    #[test]
    fn test_non_positive_quantity_rejected_without_mutation() {
        let mut session = TableSession::new("1");
        let cola = menu_item("drink_01", "콜라", 3000);
        add_item(&mut session, &cola, 1).unwrap();
        let before = session.clone();

        assert_eq!(
            add_item(&mut session, &cola, 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(
            add_item(&mut session, &cola, -3),
            Err(CartError::InvalidQuantity(-3))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_quantity_overflow_rejected_without_mutation() {
        let mut session = TableSession::new("2");
        let pasta = menu_item("pasta_01", "토마토 파스타", 12000);
        add_item(&mut session, &pasta, 4_000_000_000).unwrap();
        let before = session.clone();

        assert_eq!(
            add_item(&mut session, &pasta, 400_000_000),
            Err(CartError::InvalidQuantity(400_000_000))
        );
        assert_eq!(
            add_item(&mut session, &pasta, i64::from(u32::MAX) + 1),
            Err(CartError::InvalidQuantity(i64::from(u32::MAX) + 1))
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_total_always_matches_lines() {
        let mut session = TableSession::new("9");
        let items = [
            menu_item("pasta_01", "파스타", 12000),
            menu_item("pizza_01", "피자", 18000),
            menu_item("drink_02", "생수", 2000),
        ];
        for (i, qty) in [3, 1, 4, 1, 5, 9, 2, 6].iter().enumerate() {
            add_item(&mut session, &items[i % items.len()], *qty).unwrap();
            let expected: i64 = session.cart.iter().map(|l| l.price * i64::from(l.quantity)).sum();
            assert_eq!(session.total_amount, expected);
        }

        clear(&mut session);
        assert!(session.cart.is_empty());
        assert_eq!(session.total_amount, 0);
    }
}
