// ============================================================================
// AVL Tree Price Index
// Self-balancing binary search tree keyed by (price, arrival)
// ============================================================================

use crate::domain::Order;
use crate::interfaces::{PriceIndex, PriceOrder, PriorityKey};
use std::cmp::Ordering;

type Link = Option<Box<Node>>;

struct Node {
    key: PriorityKey,
    order: Order,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(key: PriorityKey, order: Order) -> Box<Self> {
        Box::new(Self {
            key,
            order,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

#[inline]
fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Restore the AVL invariant at `node`, assuming both subtrees satisfy it
/// and differ in height by at most two.
fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // Left-right case
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance_factor() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // Right-left case
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance_factor() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        return rotate_left(node);
    }

    node
}

fn insert_node(link: Link, key: PriorityKey, order: Order) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::leaf(key, order);
    };

    // Keys are unique: the arrival sequence separates equal prices
    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), key, order)),
        _ => node.right = Some(insert_node(node.right.take(), key, order)),
    }

    rebalance(node)
}

/// Detach the smallest node. Returns the rebalanced remainder and the node.
fn remove_min(mut node: Box<Node>) -> (Link, Box<Node>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        },
        Some(left) => {
            let (rest, min) = remove_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        },
    }
}

/// AVL tree price index
///
/// The tree is ordered by [`PriorityKey`], so the leftmost node is always
/// the best order for the configured direction and extraction is a
/// rebalancing `remove_min`.
pub struct AvlTreeIndex {
    root: Link,
    direction: PriceOrder,
    len: usize,
    next_sequence: u64,
}

impl AvlTreeIndex {
    pub fn new(direction: PriceOrder) -> Self {
        Self {
            root: None,
            direction,
            len: 0,
            next_sequence: 0,
        }
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Orders in extraction order, without removing them
    pub fn in_order(&self) -> Vec<&Order> {
        fn walk<'a>(link: &'a Link, out: &mut Vec<&'a Order>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(&node.order);
                walk(&node.right, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// Check ordering, stored heights and balance of every node
    pub fn is_balanced(&self) -> bool {
        fn check(
            link: &Link,
            lower: Option<&PriorityKey>,
            upper: Option<&PriorityKey>,
        ) -> Option<u32> {
            let Some(node) = link else {
                return Some(0);
            };
            if lower.is_some_and(|bound| *bound >= node.key)
                || upper.is_some_and(|bound| *bound <= node.key)
            {
                return None;
            }
            let left = check(&node.left, lower, Some(&node.key))?;
            let right = check(&node.right, Some(&node.key), upper)?;
            let h = 1 + left.max(right);
            if left.abs_diff(right) > 1 || h != node.height {
                return None;
            }
            Some(h)
        }

        check(&self.root, None, None).is_some()
    }
}

impl PriceIndex for AvlTreeIndex {
    fn insert(&mut self, order: Order) {
        let key = PriorityKey::new(order.price, self.next_sequence, self.direction);
        self.next_sequence += 1;
        self.root = Some(insert_node(self.root.take(), key, order));
        self.len += 1;
    }

    fn pop_best(&mut self) -> Option<Order> {
        let root = self.root.take()?;
        let (rest, min) = remove_min(root);
        self.root = rest;
        self.len -= 1;
        Some(min.order)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn price_order(&self) -> PriceOrder {
        self.direction
    }

    fn name(&self) -> &str {
        "AvlTree"
    }
}

impl Drop for AvlTreeIndex {
    // Iterative teardown so that dropping a large tree cannot overflow the stack
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}
