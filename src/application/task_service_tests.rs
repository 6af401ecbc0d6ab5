#[cfg(test)]
mod tests {
    use super::super::task_service::{TaskService, TaskServiceImpl, UpdateTaskRequest};
    use crate::domain::error::TaskError;
    use crate::domain::repository::TaskRepository;
    use crate::domain::task::{CreateTask, Task, TaskId, TaskStatus};
    use crate::infrastructure::{kv::MemoryStore, kv_repo::KvTaskRepository};
    use crate::infrastructure::memory_repo::InMemoryTaskRepository;
    use rstest::rstest;

    fn create(name: &str) -> CreateTask { CreateTask { name: name.into() } }

    fn rename(name: &str, status: Option<i64>) -> UpdateTaskRequest {
        UpdateTaskRequest { name: Some(name.into()), status }
    }

    fn set_status(status: i64) -> UpdateTaskRequest {
        UpdateTaskRequest { name: None, status: Some(status) }
    }

    fn names(tasks: &[Task]) -> Vec<&str> { tasks.iter().map(|t| t.name.as_str()).collect() }

    async fn check_create<R: TaskRepository + Clone>(repo: R) {
        let service = TaskServiceImpl::new(repo.clone());
        assert!(repo.list().await.unwrap().is_empty());

        let err = service.create_task(create("")).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        assert!(repo.list().await.unwrap().is_empty());

        service.create_task(create("task 1")).await.unwrap();
        service.create_task(create("task 2")).await.unwrap();
        // duplicated names are allowed
        service.create_task(create("task 1")).await.unwrap();

        let tasks = service.list_tasks().await.unwrap();
        assert_eq!(names(&tasks), vec!["task 1", "task 2", "task 1"]);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Incomplete));
        assert_eq!(tasks.iter().map(|t| t.id.0).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    async fn check_update<R: TaskRepository + Clone>(repo: R) {
        let service = TaskServiceImpl::new(repo);

        let err = service.update_task(TaskId(1), rename("x", Some(1))).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(TaskId(1))));

        let id = service.create_task(create("A")).await.unwrap();

        let err = service.update_task(id, set_status(99999)).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        let task = service.list_tasks().await.unwrap().remove(0);
        assert_eq!((task.name.as_str(), task.status), ("A", TaskStatus::Incomplete));

        service.update_task(id, set_status(1)).await.unwrap();
        let task = service.list_tasks().await.unwrap().remove(0);
        assert_eq!((task.name.as_str(), task.status), ("A", TaskStatus::Completed));

        service.update_task(id, rename("B", None)).await.unwrap();
        let task = service.list_tasks().await.unwrap().remove(0);
        assert_eq!((task.name.as_str(), task.status), ("B", TaskStatus::Completed));

        service.update_task(id, rename("C", Some(0))).await.unwrap();
        let task = service.list_tasks().await.unwrap().remove(0);
        assert_eq!((task.name.as_str(), task.status, task.id), ("C", TaskStatus::Incomplete, id));
    }

    async fn check_delete<R: TaskRepository + Clone>(repo: R) {
        let service = TaskServiceImpl::new(repo);
        assert!(matches!(service.delete_task(TaskId(1)).await, Err(TaskError::NotFound(_))));

        for index in 1..=10 {
            service.create_task(create(&format!("task {index}"))).await.unwrap();
        }
        service.delete_task(TaskId(2)).await.unwrap();

        let tasks = service.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 9);
        let expected: Vec<String> =
            [1, 3, 4, 5, 6, 7, 8, 9, 10].iter().map(|i| format!("task {i}")).collect();
        assert_eq!(names(&tasks), expected.iter().map(String::as_str).collect::<Vec<_>>());

        let err = service.delete_task(TaskId(2)).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(TaskId(2))));
    }

    #[rstest]
    #[case::in_memory(false)]
    #[case::key_value(true)]
    #[tokio::test]
    async fn unit_create_task(#[case] kv: bool) {
        if kv {
            check_create(KvTaskRepository::new(MemoryStore::new())).await
        } else {
            check_create(InMemoryTaskRepository::new()).await
        }
    }

    #[rstest]
    #[case::in_memory(false)]
    #[case::key_value(true)]
    #[tokio::test]
    async fn unit_update_task(#[case] kv: bool) {
        if kv {
            check_update(KvTaskRepository::new(MemoryStore::new())).await
        } else {
            check_update(InMemoryTaskRepository::new()).await
        }
    }

    #[rstest]
    #[case::in_memory(false)]
    #[case::key_value(true)]
    #[tokio::test]
    async fn unit_delete_task(#[case] kv: bool) {
        if kv {
            check_delete(KvTaskRepository::new(MemoryStore::new())).await
        } else {
            check_delete(InMemoryTaskRepository::new()).await
        }
    }
}
