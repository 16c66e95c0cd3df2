use std::marker::PhantomData;

/// 依 key 遞增排序、可選容量上限的序列。
///
/// 每次 [`insert`](Self::insert) 都以二分搜尋找出位置。序列已滿時，新值若排在
/// 所有保留元素之後就丟棄，否則插入並擠掉最後一個元素。因此序列永遠保存目前
/// 為止 key 最小的 `capacity` 個元素。
///
/// 插入前會先檢查首尾元素：key 大於等於最後一個元素時直接放到尾端，小於等於
/// 第一個元素時直接放到開頭。二分搜尋遇到 key 相等的中點時，立即插在該中點之後。
pub struct BoundedSorted<T, K, F> {
    items: Vec<T>,
    capacity: Option<usize>,
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<T, K, F> BoundedSorted<T, K, F>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    pub fn unbounded(key: F) -> Self {
        Self::with_limit(key, None)
    }

    pub fn bounded(key: F, capacity: usize) -> Self {
        Self::with_limit(key, Some(capacity))
    }

    /// 不預先配置空間：TOP 會為範圍內每一年各建一個序列，多數年份是空的
    pub fn with_limit(key: F, capacity: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            key,
            _key: PhantomData,
        }
    }

    /// 插入 `value`，回傳是否被保留
    pub fn insert(&mut self, value: T) -> bool {
        let position = self.position_of(&value);
        self.insert_or_shift(value, position)
    }

    /// 把另一個序列的元素逐一重新插入。分段掃描後必須經過這一步合併，
    /// 直接串接各段結果並不等於單一序列。
    pub fn merge(&mut self, other: Self) {
        self.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn position_of(&self, value: &T) -> usize {
        let key = (self.key)(value);

        if let (Some(first), Some(last)) = (self.items.first(), self.items.last()) {
            if key >= (self.key)(last) {
                return self.items.len();
            }
            if key <= (self.key)(first) {
                return 0;
            }
        }

        let mut start = 0;
        let mut end = self.items.len();
        while start < end {
            // 與包含式上界 (start + last) / 2 取同一個中點
            let mid = start + (end - start - 1) / 2;
            let mid_key = (self.key)(&self.items[mid]);
            if key == mid_key {
                return mid + 1;
            } else if key < mid_key {
                end = mid;
            } else {
                start = mid + 1;
            }
        }
        start
    }

    fn insert_or_shift(&mut self, value: T, position: usize) -> bool {
        match self.capacity {
            Some(cap) if self.items.len() >= cap => {
                if position >= cap {
                    return false;
                }
                self.items.pop();
                self.items.insert(position, value);
                true
            }
            _ => {
                self.items.insert(position, value);
                true
            }
        }
    }
}

impl<T, K, F> Extend<T> for BoundedSorted<T, K, F>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: std::fmt::Debug, K, F> std::fmt::Debug for BoundedSorted<T, K, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedSorted")
            .field("items", &self.items)
            .field("capacity", &self.capacity)
            .finish()
    }
}
