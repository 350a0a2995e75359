//! 客户端 IP 提取

use actix_web::dev::ServiceRequest;

/// 从请求中提取客户端 IP，仅用于访问日志
///
/// 优先使用 `X-Forwarded-For` / `Forwarded` 中的地址，否则回退到对端地址。
/// 结果不做信任校验，不应用于任何鉴权判断。
pub fn extract_client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    info.realip_remote_addr()
        .map(strip_port)
        .unwrap_or("unknown")
        .to_string()
}

/// 去掉 `ip:port` 中的端口部分，IPv6 的 `[::1]:80` 形式同样处理
fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        // 只有一个冒号时才是 ipv4:port
        Some((host, port)) if !host.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            host
        }
        _ => addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("127.0.0.1:8080"), "127.0.0.1");
        assert_eq!(strip_port("127.0.0.1"), "127.0.0.1");
        assert_eq!(strip_port("[::1]:3000"), "::1");
        assert_eq!(strip_port("::1"), "::1");
    }

    #[test]
    fn test_extract_from_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_srv_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_extract_from_peer_addr() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:5555".parse().unwrap())
            .to_srv_request();
        assert_eq!(extract_client_ip(&req), "192.0.2.10");
    }
}
