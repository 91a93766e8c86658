//! 聚合（Aggregate）抽象
//!
//! 聚合通过组合嵌入一个 [`AggregateRoot`]，并向仓储与处理器暴露：
//! - 标识与版本（经由 [`Entity`]）；
//! - 未提交事件的记录、读取与清空。
//!
//! 通常无需手写实现，使用 `mediator_macros::aggregate` 宏即可生成。
//!
use crate::aggregate_root::AggregateRoot;
use crate::entity::Entity;

/// 聚合接口
pub trait Aggregate: Entity {
    /// 聚合类型名（用于日志与错误信息）
    const TYPE: &'static str;

    /// 该聚合记录的领域事件类型（对本层不透明）
    type Event: Send + Sync + 'static;

    fn root(&self) -> &AggregateRoot<Self::Event>;

    fn root_mut(&mut self) -> &mut AggregateRoot<Self::Event>;

    /// 记录一个领域事件
    fn add_event(&mut self, event: Self::Event) {
        self.root_mut().add_event(event);
    }

    /// 未提交事件（按记录顺序）
    fn events(&self) -> &[Self::Event] {
        self.root().events()
    }

    /// 提交边界：持久化/发布后清空未提交事件
    fn clear_events(&mut self) {
        self.root_mut().clear();
    }

    fn take_events(&mut self) -> Vec<Self::Event> {
        self.root_mut().take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_object::Version;

    #[derive(Debug, Clone, PartialEq)]
    enum CounterEvent {
        Incremented { by: u32 },
    }

    struct Counter {
        root: AggregateRoot<CounterEvent>,
        value: u32,
    }

    impl Entity for Counter {
        fn id(&self) -> &str {
            self.root.id()
        }

        fn version(&self) -> Version {
            self.root.version()
        }
    }

    impl Aggregate for Counter {
        const TYPE: &'static str = "counter";
        type Event = CounterEvent;

        fn root(&self) -> &AggregateRoot<CounterEvent> {
            &self.root
        }

        fn root_mut(&mut self) -> &mut AggregateRoot<CounterEvent> {
            &mut self.root
        }
    }

    impl Counter {
        fn increment(&mut self, by: u32) {
            self.value += by;
            self.add_event(CounterEvent::Incremented { by });
        }
    }

    #[test]
    fn embedded_root_buffers_state_changes() {
        let mut c = Counter {
            root: AggregateRoot::new("c-1"),
            value: 0,
        };
        c.increment(2);
        c.increment(3);

        assert_eq!(c.value, 5);
        assert_eq!(c.id(), "c-1");
        assert_eq!(
            c.events(),
            &[
                CounterEvent::Incremented { by: 2 },
                CounterEvent::Incremented { by: 3 }
            ]
        );

        c.clear_events();
        assert!(c.events().is_empty());
    }
}
